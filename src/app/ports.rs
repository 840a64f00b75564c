//! Port traits: the hexagonal boundary between the control loop and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (ADC, UDP socket, clock, log) implement these traits.
//! The [`ControlLoop`](super::control_loop::ControlLoop) consumes them via
//! generics, so the loop never touches hardware directly.  PWM outputs and
//! the idle pause use the `embedded-hal` traits (`SetDutyCycle`, `DelayNs`)
//! instead of a local port.

use crate::error::TelemetryError;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one raw 16-bit sample per call.
pub trait SensorPort {
    /// Must return promptly; an adapter that cannot read repeats a value
    /// rather than blocking.
    fn read(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Datagram port (driven adapter: domain → network)
// ───────────────────────────────────────────────────────────────

/// Connectionless send to a destination fixed at construction.
pub trait DatagramPort {
    /// Send one datagram.  Returns the number of bytes accepted.
    /// Must not block; a full socket buffer is an error.
    fn send(&mut self, payload: &[u8]) -> Result<usize, TelemetryError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait ClockPort {
    /// Milliseconds since an arbitrary fixed origin.  Never goes backwards
    /// (modulo `u64` wrap, which the loop tolerates).
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The loop emits structured [`LoopEvent`](super::events::LoopEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::LoopEvent);
}
