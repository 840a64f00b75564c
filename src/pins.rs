//! GPIO / peripheral pin assignments for the rudder controller board.
//!
//! Single source of truth: [`PinConfig`](crate::config::PinConfig) defaults
//! are taken from here rather than hard-coding pin numbers in drivers.

// ---------------------------------------------------------------------------
// Rudder potentiometer (ADC1)
// ---------------------------------------------------------------------------

/// Rudder potentiometer wiper, analog voltage, 0 – 3.1 V.
/// ADC1 channel 3 (GPIO 4 on ESP32-S3).
pub const POT_ADC_GPIO: i32 = 4;
/// ADC1 channel index matching [`POT_ADC_GPIO`].
pub const POT_ADC1_CHANNEL: u32 = 3;

// ---------------------------------------------------------------------------
// Position indicator LEDs (LEDC PWM)
// ---------------------------------------------------------------------------

/// Single-LED indicator, also the low-side LED of the three-LED indicator.
pub const LED_LOW_GPIO: i32 = 16;
/// Centre LED of the three-LED indicator (lit inside the deadzone).
pub const LED_DEAD_GPIO: i32 = 17;
/// High-side LED of the three-LED indicator.
pub const LED_HIGH_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC base frequency for the indicator LEDs.
pub const LED_PWM_FREQ_HZ: u32 = 1_000;
/// LEDC timer resolution (bits).  14-bit is the ESP32-S3 maximum at 1 kHz.
pub const PWM_RESOLUTION_BITS: u32 = 14;

// ---------------------------------------------------------------------------
// ADC configuration
// ---------------------------------------------------------------------------

/// One-shot ADC bit width.  Raw readings are scaled up to 16 bits.
pub const ADC_RESOLUTION_BITS: u32 = 12;
