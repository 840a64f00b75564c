//! Mock adapters for integration tests.
//!
//! Each mock records what the control loop did to it so tests can assert
//! on the full history without touching real ADC, LEDC or sockets.

use std::cell::Cell;
use std::collections::VecDeque;
use std::io::ErrorKind;

use rudder_controller::app::events::LoopEvent;
use rudder_controller::app::ports::{ClockPort, DatagramPort, EventSink, SensorPort};
use rudder_controller::error::TelemetryError;

// ── Scripted sensor ───────────────────────────────────────────

/// Plays back a fixed sequence of samples, then repeats the last one.
pub struct ScriptedSensor {
    samples: VecDeque<u16>,
    last: u16,
    pub reads: u32,
}

impl ScriptedSensor {
    pub fn new(samples: &[u16]) -> Self {
        Self {
            samples: samples.iter().copied().collect(),
            last: 0,
            reads: 0,
        }
    }
}

impl SensorPort for ScriptedSensor {
    fn read(&mut self) -> u16 {
        self.reads += 1;
        if let Some(s) = self.samples.pop_front() {
            self.last = s;
        }
        self.last
    }
}

// ── Datagram recorder ─────────────────────────────────────────

/// Records every payload; fails the sends whose 0-based index is listed.
#[derive(Default)]
pub struct MockSocket {
    pub sent: Vec<Vec<u8>>,
    pub attempts: usize,
    fail_on: Vec<usize>,
}

#[allow(dead_code)]
impl MockSocket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(fail_on: &[usize]) -> Self {
        Self {
            fail_on: fail_on.to_vec(),
            ..Self::default()
        }
    }

    pub fn always_failing(n: usize) -> Self {
        Self::failing_on(&(0..n).collect::<Vec<_>>())
    }
}

impl DatagramPort for MockSocket {
    fn send(&mut self, payload: &[u8]) -> Result<usize, TelemetryError> {
        let index = self.attempts;
        self.attempts += 1;
        if self.fail_on.contains(&index) {
            return Err(TelemetryError::Io(ErrorKind::NetworkUnreachable));
        }
        self.sent.push(payload.to_vec());
        Ok(payload.len())
    }
}

// ── Manual clock ──────────────────────────────────────────────

#[derive(Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn at(ms: u64) -> Self {
        Self { now: Cell::new(ms) }
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// `DelayNs` that advances a shared [`ManualClock`] instead of sleeping.
pub struct ClockDelay<'a> {
    pub clock: &'a ManualClock,
    pub total_ms: u64,
}

impl<'a> ClockDelay<'a> {
    pub fn new(clock: &'a ManualClock) -> Self {
        Self { clock, total_ms: 0 }
    }
}

impl embedded_hal::delay::DelayNs for ClockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        let ms = u64::from(ns / 1_000_000);
        self.total_ms += ms;
        self.clock.advance(ms);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
        self.clock.advance(u64::from(ms));
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<LoopEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, LoopEvent::Tick(_)))
            .count()
    }

    pub fn failures(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, LoopEvent::TelemetryFailed { .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &LoopEvent) {
        self.events.push(*event);
    }
}

// ── Jittery clock + tick-rounded delay ────────────────────────

/// Microsecond clock read at millisecond resolution.  Each read first
/// advances it by the next jitter step, standing in for the time between
/// a task waking and the loop reading the timer.
pub struct JitterClock {
    us: Cell<u64>,
    jitter_us: Vec<u64>,
    reads: Cell<usize>,
}

impl JitterClock {
    pub fn new(jitter_us: &[u64]) -> Self {
        Self {
            us: Cell::new(0),
            jitter_us: jitter_us.to_vec(),
            reads: Cell::new(0),
        }
    }

    fn us(&self) -> u64 {
        self.us.get()
    }

    fn set_us(&self, us: u64) {
        self.us.set(us);
    }
}

impl ClockPort for JitterClock {
    fn now_ms(&self) -> u64 {
        let i = self.reads.get();
        self.reads.set(i + 1);
        let step = self.jitter_us[i % self.jitter_us.len()];
        self.us.set(self.us.get() + step);
        self.us.get() / 1_000
    }
}

/// `DelayNs` that behaves like `vTaskDelay`: the pause is rounded up to
/// whole scheduler ticks and the task wakes on a tick edge.
pub struct TickDelay<'a> {
    clock: &'a JitterClock,
    tick_us: u64,
}

impl<'a> TickDelay<'a> {
    pub fn new(clock: &'a JitterClock, tick_us: u64) -> Self {
        Self { clock, tick_us }
    }
}

impl embedded_hal::delay::DelayNs for TickDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        let ticks = u64::from(ns).div_ceil(self.tick_us * 1_000).max(1);
        let edge = self.clock.us() / self.tick_us;
        self.clock.set_us((edge + ticks) * self.tick_us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay_ns(ms.saturating_mul(1_000_000));
    }
}
