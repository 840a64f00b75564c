//! System configuration parameters
//!
//! All tunables for the rudder controller.  The configuration is built once
//! at startup, validated, and handed to the control loop by value; nothing
//! mutates it afterwards.

use core::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};

use serde::Serialize;

use crate::adapters::wifi::RetryPolicy;
use crate::control::deadzone::{Deadzone, IndicatorMode};
use crate::error::ConfigError;
use crate::pins;

/// Core system configuration
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ControllerConfig {
    pub network: NetworkConfig,
    pub indicator: IndicatorConfig,
    pub timing: TimingConfig,
    pub pins: PinConfig,
}

/// WiFi station credentials.  The password never appears in logs.
#[derive(Clone, Copy, Serialize)]
pub struct WifiCredentials {
    pub ssid: &'static str,
    #[serde(skip)]
    pub password: &'static str,
}

impl fmt::Debug for WifiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiCredentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct NetworkConfig {
    pub credentials: WifiCredentials,
    /// Telemetry listener IPv4 address.
    pub telemetry_ip: [u8; 4],
    /// Telemetry listener UDP port.
    pub telemetry_port: u16,
    /// Overall WiFi association budget (milliseconds).
    pub connect_timeout_ms: u32,
    /// Maximum association attempts before giving up.
    pub connect_max_attempts: u32,
    /// Initial pause between attempts, doubled after each failure.
    pub connect_backoff_ms: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndicatorConfig {
    /// One LED or three LEDs (low / dead / high).
    pub mode: IndicatorMode,
    /// Lowest raw sample treated as centred (inclusive).
    pub deadzone_min: u16,
    /// Highest raw sample treated as centred (inclusive).
    pub deadzone_max: u16,
    /// Fixed duty of the centre LED while inside the deadzone.
    pub dead_intensity: u16,
    /// LEDC timer frequency.
    pub pwm_freq_hz: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TimingConfig {
    /// Minimum time between tick starts (milliseconds).
    pub tick_interval_ms: u32,
    /// Unconditional pause between tick-boundary checks (milliseconds).
    pub idle_pause_ms: u32,
    /// Emit a summary event every N ticks; 0 disables summaries.
    pub summary_interval_ticks: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PinConfig {
    pub pot_adc_gpio: i32,
    pub pot_adc1_channel: u32,
    /// Indicator LED GPIOs in channel order (low, dead, high).
    /// Single mode only drives the first.
    pub led_gpios: [i32; 3],
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig {
                credentials: WifiCredentials {
                    ssid: "rudder-net",
                    password: "change-me-please",
                },
                telemetry_ip: [192, 168, 1, 42],
                telemetry_port: 3030,
                connect_timeout_ms: 30_000,
                connect_max_attempts: 8,
                connect_backoff_ms: 500,
            },
            indicator: IndicatorConfig {
                mode: IndicatorMode::Single,
                deadzone_min: 32_000,
                deadzone_max: 33_535,
                dead_intensity: 5_000,
                pwm_freq_hz: pins::LED_PWM_FREQ_HZ,
            },
            timing: TimingConfig {
                tick_interval_ms: 10, // 100 Hz
                idle_pause_ms: 1,
                summary_interval_ticks: 500, // every 5 s
            },
            pins: PinConfig {
                pot_adc_gpio: pins::POT_ADC_GPIO,
                pot_adc1_channel: pins::POT_ADC1_CHANNEL,
                led_gpios: [pins::LED_LOW_GPIO, pins::LED_DEAD_GPIO, pins::LED_HIGH_GPIO],
            },
        }
    }
}

impl ControllerConfig {
    /// Check every cross-field invariant.  Called once before the loop starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicator.deadzone()?;
        if self.timing.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.timing.idle_pause_ms >= self.timing.tick_interval_ms {
            return Err(ConfigError::IdlePauseTooLong {
                pause_ms: self.timing.idle_pause_ms,
                interval_ms: self.timing.tick_interval_ms,
            });
        }
        if self.network.telemetry_port == 0 {
            return Err(ConfigError::ZeroTelemetryPort);
        }
        if self.network.connect_max_attempts == 0 {
            return Err(ConfigError::ZeroConnectAttempts);
        }
        if self.indicator.pwm_freq_hz == 0 {
            return Err(ConfigError::ZeroPwmFrequency);
        }
        Ok(())
    }

    /// Same configuration with a different indicator mode.
    pub fn with_mode(mut self, mode: IndicatorMode) -> Self {
        self.indicator.mode = mode;
        self
    }

    /// LED GPIOs actually driven in the configured mode.
    pub fn active_led_gpios(&self) -> &[i32] {
        &self.pins.led_gpios[..self.indicator.mode.channel_count()]
    }
}

impl NetworkConfig {
    pub fn telemetry_addr(&self) -> SocketAddrV4 {
        let [a, b, c, d] = self.telemetry_ip;
        SocketAddrV4::new(Ipv4Addr::new(a, b, c, d), self.telemetry_port)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.connect_max_attempts,
            timeout_ms: self.connect_timeout_ms,
            initial_backoff_ms: self.connect_backoff_ms,
        }
    }
}

impl IndicatorConfig {
    pub fn deadzone(&self) -> Result<Deadzone, ConfigError> {
        Deadzone::new(self.deadzone_min, self.deadzone_max)
    }
}
