//! Outbound loop events.
//!
//! The [`ControlLoop`](super::control_loop::ControlLoop) emits these through
//! the [`EventSink`](super::ports::EventSink) port.

use crate::control::deadzone::{IndicatorMode, LevelSet};
use crate::error::TelemetryError;

/// Structured events emitted by the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    /// The loop has started (carries the indicator layout and cadence).
    Started {
        mode: IndicatorMode,
        tick_interval_ms: u32,
    },

    /// One tick completed.
    Tick(TickReport),

    /// A telemetry datagram could not be sent; the tick carried on.
    TelemetryFailed { sample: u16, error: TelemetryError },

    /// Periodic counters.
    Summary(LoopStats),
}

/// Everything one tick did, produced from a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Clock reading at the tick boundary.
    pub at_ms: u64,
    pub sample: u16,
    pub levels: LevelSet,
    pub telemetry: Result<(), TelemetryError>,
}

/// Running loop counters (saturating).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopStats {
    pub ticks: u64,
    pub telemetry_sent: u64,
    pub telemetry_failed: u64,
}
