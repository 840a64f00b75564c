//! Fixed-rate control loop: the core of the firmware.
//!
//! ```text
//!              ┌──────────── IdleWait ◀───────────┐
//!              │  now - last_tick >= interval      │ always
//!              ▼                                   │
//!         TickExecute:  SensorPort::read ──▶ Classifier ──▶ IndicatorDriver
//!                                       └──────────────────▶ TelemetrySender
//! ```
//!
//! [`ControlLoop`] owns the sensor, the indicator outputs and the telemetry
//! socket.  The clock, the idle delay and the event sink are injected at
//! call sites, like every other port.  Ticks are strictly sequential: a tick
//! runs to completion inside [`ControlLoop::poll`] before the next boundary
//! check, and a telemetry failure never propagates past the tick.

use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::SetDutyCycle;
use log::info;

use crate::config::{ControllerConfig, TimingConfig};
use crate::control::deadzone::Classifier;
use crate::drivers::indicator::IndicatorDriver;
use crate::error::{ActuatorError, Result};
use crate::telemetry::sender::TelemetrySender;

use super::events::{LoopEvent, LoopStats, TickReport};
use super::ports::{ClockPort, DatagramPort, EventSink, SensorPort};

/// Scheduler state.  Observed from outside the loop it is always
/// `IdleWait`; `TickExecute` only holds for the duration of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    IdleWait,
    TickExecute,
}

pub struct ControlLoop<S, P, D>
where
    S: SensorPort,
    P: SetDutyCycle,
    D: DatagramPort,
{
    sensor: S,
    classifier: Classifier,
    indicator: IndicatorDriver<P>,
    telemetry: TelemetrySender<D>,
    timing: TimingConfig,
    state: LoopState,
    last_tick_ms: u64,
    stats: LoopStats,
}

impl<S, P, D> ControlLoop<S, P, D>
where
    S: SensorPort,
    P: SetDutyCycle,
    D: DatagramPort,
{
    /// Assemble the loop.  Validates the configuration and checks that the
    /// indicator was built for the configured layout.
    ///
    /// Does **not** start the clock; call [`start`](Self::start) next.
    pub fn new(
        config: &ControllerConfig,
        sensor: S,
        indicator: IndicatorDriver<P>,
        telemetry: TelemetrySender<D>,
    ) -> Result<Self> {
        config.validate()?;
        let classifier = Classifier::from_config(&config.indicator)?;
        if indicator.mode() != classifier.mode() {
            return Err(ActuatorError::ChannelCountMismatch {
                expected: classifier.mode().channel_count(),
                got: indicator.channels().len(),
            }
            .into());
        }
        Ok(Self {
            sensor,
            classifier,
            indicator,
            telemetry,
            timing: config.timing,
            state: LoopState::IdleWait,
            last_tick_ms: 0,
            stats: LoopStats::default(),
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Darken the indicator and start the clock.  The first tick fires one
    /// interval from now.
    pub fn start(&mut self, clock: &impl ClockPort, sink: &mut impl EventSink) {
        self.indicator.all_off();
        self.last_tick_ms = clock.now_ms();
        self.state = LoopState::IdleWait;
        sink.emit(&LoopEvent::Started {
            mode: self.classifier.mode(),
            tick_interval_ms: self.timing.tick_interval_ms,
        });
        info!(
            "ControlLoop started ({:?}, {}ms tick, deadzone {}..={})",
            self.classifier.mode(),
            self.timing.tick_interval_ms,
            self.classifier.deadzone().min(),
            self.classifier.deadzone().max()
        );
    }

    // ── Per-iteration scheduling ──────────────────────────────

    /// Check the tick boundary and, if due, run exactly one tick.
    ///
    /// Returns the tick's report, or `None` if the interval has not elapsed.
    pub fn poll(
        &mut self,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Option<TickReport> {
        let now = clock.now_ms();
        if now.wrapping_sub(self.last_tick_ms) < u64::from(self.timing.tick_interval_ms) {
            return None;
        }

        self.state = LoopState::TickExecute;
        let report = self.tick(now);
        self.last_tick_ms = now;
        self.state = LoopState::IdleWait;

        self.record(&report, sink);
        Some(report)
    }

    /// One loop iteration: boundary check, then the unconditional idle pause.
    pub fn step(
        &mut self,
        clock: &impl ClockPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Option<TickReport> {
        let report = self.poll(clock, sink);
        delay.delay_ms(self.timing.idle_pause_ms);
        report
    }

    /// Run until reset.  `on_iteration` runs after every step (the firmware
    /// feeds the watchdog there).
    pub fn run_forever(
        &mut self,
        clock: &impl ClockPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
        mut on_iteration: impl FnMut(),
    ) -> ! {
        loop {
            self.step(clock, delay, sink);
            on_iteration();
        }
    }

    // ── Tick body ─────────────────────────────────────────────

    /// Read → classify → actuate → telemeter, all from one sample.
    fn tick(&mut self, now: u64) -> TickReport {
        let sample = self.sensor.read();
        let levels = self.classifier.levels(sample);
        self.indicator.apply(&levels);
        let telemetry = self.telemetry.send(sample);
        TickReport {
            at_ms: now,
            sample,
            levels,
            telemetry,
        }
    }

    fn record(&mut self, report: &TickReport, sink: &mut impl EventSink) {
        self.stats.ticks = self.stats.ticks.saturating_add(1);
        match report.telemetry {
            Ok(()) => {
                self.stats.telemetry_sent = self.stats.telemetry_sent.saturating_add(1);
            }
            Err(error) => {
                self.stats.telemetry_failed = self.stats.telemetry_failed.saturating_add(1);
                sink.emit(&LoopEvent::TelemetryFailed {
                    sample: report.sample,
                    error,
                });
            }
        }
        sink.emit(&LoopEvent::Tick(*report));

        let every = u64::from(self.timing.summary_interval_ticks);
        if every > 0 && self.stats.ticks % every == 0 {
            sink.emit(&LoopEvent::Summary(self.stats));
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Clock reading at the last completed tick (or at `start`).
    pub fn last_tick_ms(&self) -> u64 {
        self.last_tick_ms
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn indicator(&self) -> &IndicatorDriver<P> {
        &self.indicator
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn telemetry(&self) -> &TelemetrySender<D> {
        &self.telemetry
    }

    pub fn telemetry_mut(&mut self) -> &mut TelemetrySender<D> {
        &mut self.telemetry
    }
}
