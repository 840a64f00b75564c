//! WiFi station-mode adapter.
//!
//! Associates with the configured access point before the control loop
//! starts.  Association is a bounded operation: [`connect_with_retry`]
//! gives up after a fixed number of attempts or an overall timeout and
//! hands the failure back to `main`, which treats it as fatal.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## Retry policy
//!
//! After a failed attempt the adapter waits an exponential backoff
//! (`initial_backoff_ms` doubling, capped at [`MAX_BACKOFF_MS`] and at the
//! remaining budget) before retrying.

use std::net::Ipv4Addr;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::ports::ClockPort;
use crate::config::WifiCredentials;
use crate::error::ConnectivityError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};

const MAX_BACKOFF_MS: u32 = 8_000;

// ───────────────────────────────────────────────────────────────
// Retry policy
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub timeout_ms: u32,
    pub initial_backoff_ms: u32,
}

/// Run `attempt` until it succeeds, the attempt cap is hit, or the overall
/// timeout elapses.  `attempt` receives the 1-based attempt number.
pub fn connect_with_retry<T>(
    policy: RetryPolicy,
    clock: &impl ClockPort,
    delay: &mut impl DelayNs,
    mut attempt: impl FnMut(u32) -> Result<T, ConnectivityError>,
) -> Result<T, ConnectivityError> {
    let started = clock.now_ms();
    let budget = u64::from(policy.timeout_ms);
    let mut backoff = policy.initial_backoff_ms;
    let mut n = 0;

    loop {
        n += 1;
        match attempt(n) {
            Ok(v) => return Ok(v),
            // Bad credentials will not get better by retrying.
            Err(e @ (ConnectivityError::InvalidSsid
            | ConnectivityError::InvalidPassword
            | ConnectivityError::NoCredentials)) => return Err(e),
            Err(e) => warn!("WiFi: attempt {}/{} failed: {}", n, policy.max_attempts, e),
        }

        let elapsed = clock.now_ms().wrapping_sub(started);
        if n >= policy.max_attempts || elapsed >= budget {
            return Err(ConnectivityError::TimedOut {
                attempts: n,
                elapsed_ms: elapsed,
            });
        }

        let remaining = (budget - elapsed).min(u64::from(u32::MAX)) as u32;
        delay.delay_ms(backoff.min(remaining));
        backoff = backoff.saturating_mul(2).min(MAX_BACKOFF_MS);
    }
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(ConnectivityError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    ip: Option<Ipv4Addr>,
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    /// Simulation: number of upcoming attempts that fail.
    #[cfg(not(target_os = "espidf"))]
    sim_failures: u32,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(wifi: BlockingWifi<EspWifi<'static>>) -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            ip: None,
            wifi,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            ip: None,
            sim_failures: 0,
        }
    }

    /// Make the next `n` simulated attempts fail.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_attempts(&mut self, n: u32) {
        self.sim_failures = n;
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    pub fn ip(&self) -> Option<Ipv4Addr> {
        self.ip
    }

    pub fn is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }

    pub fn set_credentials(&mut self, creds: &WifiCredentials) -> Result<(), ConnectivityError> {
        validate_ssid(creds.ssid)?;
        validate_password(creds.password)?;
        self.ssid.clear();
        self.ssid
            .push_str(creds.ssid)
            .map_err(|_| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(creds.password)
            .map_err(|_| ConnectivityError::InvalidPassword)?;
        info!("WiFi: credentials set (SSID='{}')", self.ssid);
        Ok(())
    }

    /// Associate and wait for an address, within `policy`.
    pub fn connect(
        &mut self,
        policy: RetryPolicy,
        clock: &impl ClockPort,
        delay: &mut impl DelayNs,
    ) -> Result<Ipv4Addr, ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        if self.state == WifiState::Connected {
            return Err(ConnectivityError::AlreadyConnected);
        }

        info!("WiFi: connecting to '{}'", self.ssid);
        self.state = WifiState::Connecting;

        match connect_with_retry(policy, clock, delay, |n| self.platform_connect(n)) {
            Ok(ip) => {
                self.state = WifiState::Connected;
                self.ip = Some(ip);
                info!("WiFi: connected, IP address {}", ip);
                Ok(ip)
            }
            Err(e) => {
                self.state = WifiState::Failed;
                self.ip = None;
                Err(e)
            }
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self, attempt: u32) -> Result<Ipv4Addr, ConnectivityError> {
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let cfg = Configuration::Client(ClientConfiguration {
            ssid: self
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        });

        let failed = |e: esp_idf_svc::sys::EspError| {
            warn!("WiFi(espidf): attempt {} driver error {}", attempt, e);
            ConnectivityError::ConnectionFailed
        };
        self.wifi.set_configuration(&cfg).map_err(failed)?;
        if !self.wifi.is_started().map_err(failed)? {
            self.wifi.start().map_err(failed)?;
        }
        self.wifi.connect().map_err(failed)?;
        self.wifi.wait_netif_up().map_err(failed)?;
        let info = self.wifi.wifi().sta_netif().get_ip_info().map_err(failed)?;
        Ok(info.ip)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self, attempt: u32) -> Result<Ipv4Addr, ConnectivityError> {
        if self.sim_failures > 0 {
            self.sim_failures -= 1;
            warn!("WiFi(sim): simulated association failure (attempt {})", attempt);
            return Err(ConnectivityError::ConnectionFailed);
        }
        info!("WiFi(sim): connected to '{}' (attempt {})", self.ssid, attempt);
        Ok(Ipv4Addr::LOCALHOST)
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
