//! Unified error types for the rudder controller firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! startup path's error handling uniform.  Variants are `Copy` so they can
//! be returned from the control loop without allocation; I/O failures carry
//! a [`std::io::ErrorKind`] rather than the full `io::Error`.

use core::fmt;
use std::io::ErrorKind;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration failed validation.
    Config(ConfigError),
    /// WiFi association failed.
    Connectivity(ConnectivityError),
    /// A telemetry datagram could not be sent or decoded.
    Telemetry(TelemetryError),
    /// The indicator outputs could not be set up.
    Actuator(ActuatorError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Connectivity(e) => write!(f, "connectivity: {e}"),
            Self::Telemetry(e) => write!(f, "telemetry: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `deadzone_min` is above `deadzone_max`.
    DeadzoneInverted { min: u16, max: u16 },
    /// The tick interval must be at least 1 ms.
    ZeroTickInterval,
    /// The idle pause must be shorter than the tick interval.
    IdlePauseTooLong { pause_ms: u32, interval_ms: u32 },
    /// Telemetry destination port 0 is not routable.
    ZeroTelemetryPort,
    /// WiFi association needs at least one attempt.
    ZeroConnectAttempts,
    /// PWM frequency must be non-zero.
    ZeroPwmFrequency,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeadzoneInverted { min, max } => {
                write!(f, "deadzone min {min} is above max {max}")
            }
            Self::ZeroTickInterval => write!(f, "tick interval must be non-zero"),
            Self::IdlePauseTooLong { pause_ms, interval_ms } => write!(
                f,
                "idle pause {pause_ms}ms must be shorter than tick interval {interval_ms}ms"
            ),
            Self::ZeroTelemetryPort => write!(f, "telemetry port must be non-zero"),
            Self::ZeroConnectAttempts => write!(f, "WiFi connect attempts must be non-zero"),
            Self::ZeroPwmFrequency => write!(f, "PWM frequency must be non-zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Connectivity errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
    AlreadyConnected,
    /// Association did not complete within the retry budget.
    TimedOut { attempts: u32, elapsed_ms: u64 },
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(
                f,
                "password invalid (must be 8-64 bytes for WPA2, or empty for open)"
            ),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
            Self::AlreadyConnected => write!(f, "already connected to AP"),
            Self::TimedOut { attempts, elapsed_ms } => write!(
                f,
                "WiFi association gave up after {attempts} attempts ({elapsed_ms}ms)"
            ),
        }
    }
}

impl std::error::Error for ConnectivityError {}

impl From<ConnectivityError> for Error {
    fn from(e: ConnectivityError) -> Self {
        Self::Connectivity(e)
    }
}

// ---------------------------------------------------------------------------
// Telemetry errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryError {
    /// The socket reported an I/O error (unreachable, would block, ...).
    Io(ErrorKind),
    /// The socket accepted fewer bytes than the datagram length.
    Truncated { sent: usize },
    /// A received datagram was shorter than two bytes.
    Malformed { len: usize },
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "send failed: {kind}"),
            Self::Truncated { sent } => write!(f, "datagram truncated ({sent} bytes sent)"),
            Self::Malformed { len } => write!(f, "datagram too short ({len} bytes)"),
        }
    }
}

impl std::error::Error for TelemetryError {}

impl From<std::io::Error> for TelemetryError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.kind())
    }
}

impl From<TelemetryError> for Error {
    fn from(e: TelemetryError) -> Self {
        Self::Telemetry(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// The number of PWM channels does not match the indicator mode.
    ChannelCountMismatch { expected: usize, got: usize },
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelCountMismatch { expected, got } => {
                write!(f, "indicator needs {expected} PWM channels, got {got}")
            }
        }
    }
}

impl std::error::Error for ActuatorError {}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
