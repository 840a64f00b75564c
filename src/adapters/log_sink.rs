//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing loop events to the ESP-IDF logger
//! (UART / USB-CDC in production).  Per-tick lines go out at `debug` so a
//! 100 Hz loop does not flood the console at the default level.
//!
//! Telemetry failures are logged at `warn` on the first failure of a
//! streak and whenever the streak length reaches a power of two; the rest
//! of the streak is logged at `debug`.

use log::{debug, info, warn};

use crate::app::events::LoopEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`LoopEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink {
    failure_streak: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consecutive telemetry failures since the last successful send.
    pub fn failure_streak(&self) -> u32 {
        self.failure_streak
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &LoopEvent) {
        match event {
            LoopEvent::Started {
                mode,
                tick_interval_ms,
            } => {
                info!("START | indicator={:?} tick={}ms", mode, tick_interval_ms);
            }
            LoopEvent::Tick(t) => {
                if t.telemetry.is_ok() && self.failure_streak > 0 {
                    info!("TELEM | recovered after {} failed sends", self.failure_streak);
                    self.failure_streak = 0;
                }
                debug!(
                    "TICK  | t={}ms adc={} levels={:?} sent={}",
                    t.at_ms,
                    t.sample,
                    t.levels,
                    t.telemetry.is_ok()
                );
            }
            LoopEvent::TelemetryFailed { sample, error } => {
                self.failure_streak = self.failure_streak.saturating_add(1);
                if self.failure_streak.is_power_of_two() {
                    warn!(
                        "TELEM | send failed for adc={}: {} (streak={})",
                        sample, error, self.failure_streak
                    );
                } else {
                    debug!("TELEM | send failed for adc={}: {}", sample, error);
                }
            }
            LoopEvent::Summary(s) => {
                info!(
                    "STATS | ticks={} sent={} failed={}",
                    s.ticks, s.telemetry_sent, s.telemetry_failed
                );
            }
        }
    }
}
