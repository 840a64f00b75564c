//! Control loop end-to-end: scripted samples in, indicator duties and
//! telemetry datagrams out.

use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use rudder_controller::adapters::udp::UdpDatagram;
use rudder_controller::app::control_loop::{ControlLoop, LoopState};
use rudder_controller::app::events::LoopEvent;
use rudder_controller::config::ControllerConfig;
use rudder_controller::control::deadzone::{IndicatorMode, LevelSet, TripleLevels};
use rudder_controller::drivers::indicator::IndicatorDriver;
use rudder_controller::drivers::ledc::SimPwm;
use rudder_controller::error::{ActuatorError, Error};
use rudder_controller::telemetry::codec::decode_sample;
use rudder_controller::telemetry::sender::TelemetrySender;

use crate::mock_hw::{
    ClockDelay, JitterClock, ManualClock, MockSocket, RecordingSink, ScriptedSensor, TickDelay,
};

type TestLoop<D> = ControlLoop<ScriptedSensor, SimPwm, D>;

fn build<D: rudder_controller::app::ports::DatagramPort>(
    config: &ControllerConfig,
    samples: &[u16],
    socket: D,
) -> TestLoop<D> {
    let mode = config.indicator.mode;
    let pwms = (0..mode.channel_count()).map(|_| SimPwm::new());
    let indicator = IndicatorDriver::new(mode, pwms).unwrap();
    ControlLoop::new(
        config,
        ScriptedSensor::new(samples),
        indicator,
        TelemetrySender::new(socket),
    )
    .unwrap()
}

fn duties<D: rudder_controller::app::ports::DatagramPort>(l: &TestLoop<D>) -> Vec<u16> {
    l.indicator().channels().iter().map(SimPwm::duty).collect()
}

// ── Single LED ────────────────────────────────────────────────

#[test]
fn single_led_follows_distance_from_centre() {
    let config = ControllerConfig::default();
    let mut l = build(&config, &[0, 32_768, 65_535, 40_000], MockSocket::new());
    let clock = ManualClock::at(0);
    let mut sink = RecordingSink::new();

    l.start(&clock, &mut sink);
    let mut seen = Vec::new();
    for _ in 0..4 {
        clock.advance(10);
        let report = l.poll(&clock, &mut sink).unwrap();
        seen.push((report.levels, duties(&l)[0]));
    }

    assert_eq!(
        seen,
        vec![
            (LevelSet::Single(65_535), 65_535),
            (LevelSet::Single(0), 0),
            (LevelSet::Single(65_535), 65_535),
            (LevelSet::Single(13_240), 13_240),
        ]
    );
    assert_eq!(
        l.telemetry().port().sent,
        vec![vec![0x00, 0x00], vec![0x00, 0x80], vec![0xFF, 0xFF], vec![0x40, 0x9C]]
    );
}

#[test]
fn start_darkens_indicator_and_reports_mode() {
    let config = ControllerConfig::default().with_mode(IndicatorMode::Triple);
    let mut l = build(&config, &[], MockSocket::new());
    let clock = ManualClock::at(5);
    let mut sink = RecordingSink::new();

    l.start(&clock, &mut sink);

    assert_eq!(duties(&l), vec![0, 0, 0]);
    assert_eq!(l.last_tick_ms(), 5);
    assert_eq!(
        sink.events,
        vec![LoopEvent::Started {
            mode: IndicatorMode::Triple,
            tick_interval_ms: 10,
        }]
    );
}

// ── Three LEDs ────────────────────────────────────────────────

#[test]
fn triple_led_lights_one_channel_per_band() {
    let config = ControllerConfig::default().with_mode(IndicatorMode::Triple);
    let mut l = build(&config, &[10_000, 32_000, 33_535, 40_000], MockSocket::new());
    let clock = ManualClock::at(0);
    let mut sink = RecordingSink::new();
    l.start(&clock, &mut sink);

    let mut observed = Vec::new();
    for _ in 0..4 {
        clock.advance(10);
        l.poll(&clock, &mut sink).unwrap();
        observed.push(duties(&l));
    }

    assert_eq!(
        observed,
        vec![
            vec![45_055, 0, 0],
            vec![0, 5_000, 0],
            vec![0, 5_000, 0],
            vec![0, 0, 13_240],
        ]
    );
}

#[test]
fn triple_report_carries_named_levels() {
    let config = ControllerConfig::default().with_mode(IndicatorMode::Triple);
    let mut l = build(&config, &[0], MockSocket::new());
    let clock = ManualClock::at(0);
    let mut sink = RecordingSink::new();
    l.start(&clock, &mut sink);

    clock.advance(10);
    let report = l.poll(&clock, &mut sink).unwrap();
    assert_eq!(
        report.levels,
        LevelSet::Triple(TripleLevels {
            low: 65_535,
            dead: 0,
            high: 0,
        })
    );
}

#[test]
fn indicator_mode_must_match_config() {
    let config = ControllerConfig::default();
    let pwms = [SimPwm::new(), SimPwm::new(), SimPwm::new()];
    let indicator = IndicatorDriver::new(IndicatorMode::Triple, pwms).unwrap();
    let result = ControlLoop::new(
        &config,
        ScriptedSensor::new(&[]),
        indicator,
        TelemetrySender::new(MockSocket::new()),
    );
    assert_eq!(
        result.err(),
        Some(Error::Actuator(ActuatorError::ChannelCountMismatch {
            expected: 1,
            got: 3,
        }))
    );
}

// ── Telemetry failures ────────────────────────────────────────

#[test]
fn send_failure_does_not_stop_the_loop() {
    let config = ControllerConfig::default();
    let mut l = build(&config, &[100, 200, 300], MockSocket::failing_on(&[1]));
    let clock = ManualClock::at(0);
    let mut sink = RecordingSink::new();
    l.start(&clock, &mut sink);

    for i in 1..=3u64 {
        clock.advance(10);
        let report = l.poll(&clock, &mut sink).unwrap();
        assert_eq!(report.at_ms, i * 10);
        assert_eq!(l.last_tick_ms(), i * 10);
        assert_eq!(l.state(), LoopState::IdleWait);
    }

    let stats = l.stats();
    assert_eq!(stats.ticks, 3);
    assert_eq!(stats.telemetry_sent, 2);
    assert_eq!(stats.telemetry_failed, 1);
    assert_eq!(sink.ticks(), 3);
    assert_eq!(sink.failures(), 1);
    assert_eq!(l.telemetry().port().sent, vec![vec![100, 0], vec![44, 1]]);
}

#[test]
fn failed_tick_still_drives_indicator() {
    let config = ControllerConfig::default();
    let mut l = build(&config, &[65_535], MockSocket::always_failing(4));
    let clock = ManualClock::at(0);
    let mut sink = RecordingSink::new();
    l.start(&clock, &mut sink);

    clock.advance(10);
    let report = l.poll(&clock, &mut sink).unwrap();
    assert!(report.telemetry.is_err());
    assert_eq!(duties(&l), vec![65_535]);
}

// ── Scheduling ────────────────────────────────────────────────

#[test]
fn stepping_with_idle_pause_ticks_every_interval() {
    let config = ControllerConfig::default();
    let mut l = build(&config, &[1_000], MockSocket::new());
    let clock = ManualClock::at(0);
    let mut delay = ClockDelay::new(&clock);
    let mut sink = RecordingSink::new();
    l.start(&clock, &mut sink);

    let ticks: Vec<u64> = (0..100)
        .filter_map(|_| l.step(&clock, &mut delay, &mut sink))
        .map(|r| r.at_ms)
        .collect();

    assert_eq!(ticks, vec![10, 20, 30, 40, 50, 60, 70, 80, 90]);
    assert_eq!(delay.total_ms, 100);
    assert_eq!(l.sensor_mut().reads, 9);
}

/// FreeRTOS scheduler tick period shipped in `sdkconfig.defaults`.
fn freertos_tick_us() -> u64 {
    let hz: u64 = include_str!("../../sdkconfig.defaults")
        .lines()
        .find_map(|l| l.strip_prefix("CONFIG_FREERTOS_HZ="))
        .expect("sdkconfig.defaults sets CONFIG_FREERTOS_HZ")
        .trim()
        .parse()
        .unwrap();
    1_000_000 / hz
}

#[test]
fn cadence_holds_with_tick_rounded_pause_and_jittery_clock() {
    let config = ControllerConfig::default();
    let mut l = build(&config, &[1_000], MockSocket::new());
    // One step crosses a millisecond edge before the read.
    let clock = JitterClock::new(&[130, 470, 20, 1_260, 310, 5, 640]);
    let mut delay = TickDelay::new(&clock, freertos_tick_us());
    let mut sink = RecordingSink::new();
    l.start(&clock, &mut sink);

    let ticks: Vec<u64> = (0..3_000)
        .filter_map(|_| l.step(&clock, &mut delay, &mut sink))
        .map(|r| r.at_ms)
        .collect();

    assert!(ticks.len() > 100, "only {} ticks", ticks.len());
    for pair in ticks.windows(2) {
        let gap = pair[1] - pair[0];
        assert!((10..=11).contains(&gap), "{gap} ms between ticks at {}", pair[0]);
    }
}

#[test]
fn late_tick_rebases_on_the_check_time() {
    let config = ControllerConfig::default();
    let mut l = build(&config, &[1], MockSocket::new());
    let clock = ManualClock::at(0);
    let mut sink = RecordingSink::new();
    l.start(&clock, &mut sink);

    clock.set(37);
    assert!(l.poll(&clock, &mut sink).is_some());
    // No catch-up ticks for the missed boundaries.
    assert!(l.poll(&clock, &mut sink).is_none());
    clock.set(46);
    assert!(l.poll(&clock, &mut sink).is_none());
    clock.set(47);
    assert!(l.poll(&clock, &mut sink).is_some());
}

#[test]
fn clock_wraparound_keeps_ticking() {
    let config = ControllerConfig::default();
    let mut l = build(&config, &[1], MockSocket::new());
    let clock = ManualClock::at(u64::MAX - 4);
    let mut sink = RecordingSink::new();
    l.start(&clock, &mut sink);

    clock.advance(9);
    assert!(l.poll(&clock, &mut sink).is_none());
    clock.advance(1);
    assert_eq!(l.poll(&clock, &mut sink).map(|r| r.at_ms), Some(5));
}

#[test]
fn summary_emitted_every_n_ticks() {
    let mut config = ControllerConfig::default();
    config.timing.summary_interval_ticks = 2;
    let mut l = build(&config, &[1], MockSocket::failing_on(&[0]));
    let clock = ManualClock::at(0);
    let mut sink = RecordingSink::new();
    l.start(&clock, &mut sink);

    for _ in 0..5 {
        clock.advance(10);
        l.poll(&clock, &mut sink);
    }

    let summaries: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            LoopEvent::Summary(s) => Some((s.ticks, s.telemetry_failed)),
            _ => None,
        })
        .collect();
    assert_eq!(summaries, vec![(2, 1), (4, 1)]);
}

// ── Real socket ───────────────────────────────────────────────

#[test]
fn datagrams_reach_a_udp_listener() {
    let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
    listener
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let dest = match listener.local_addr().unwrap() {
        SocketAddr::V4(a) => a,
        SocketAddr::V6(_) => unreachable!("bound to an IPv4 address"),
    };

    let config = ControllerConfig::default();
    let socket = UdpDatagram::bind(dest).unwrap();
    let mut l = build(&config, &[1, 0x1234, 65_535], socket);
    let clock = ManualClock::at(0);
    let mut sink = RecordingSink::new();
    l.start(&clock, &mut sink);

    for _ in 0..3 {
        clock.advance(10);
        let report = l.poll(&clock, &mut sink).unwrap();
        assert_eq!(report.telemetry, Ok(()));
    }

    let mut received = Vec::new();
    let mut buf = [0u8; 16];
    for _ in 0..3 {
        let (n, _) = listener.recv_from(&mut buf).unwrap();
        received.push(decode_sample(&buf[..n]).unwrap());
    }
    assert_eq!(received, vec![1, 0x1234, 65_535]);
}
