//! Rudder Controller Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  PotSensor     LedcChannel×N   UdpDatagram    Esp32Time        │
//! │  (SensorPort)  (SetDutyCycle)  (DatagramPort) (ClockPort)      │
//! │  LogEventSink  IdleDelay       WifiAdapter    Watchdog         │
//! │  (EventSink)   (DelayNs)       (startup only)                  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ControlLoop (10 ms fixed rate)              │    │
//! │  │  read → Classifier → IndicatorDriver                   │    │
//! │  │       └────────────→ TelemetrySender                   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use rudder_controller::adapters::log_sink::LogEventSink;
use rudder_controller::adapters::time::{Esp32TimeAdapter, IdleDelay};
use rudder_controller::adapters::udp::UdpDatagram;
use rudder_controller::adapters::wifi::WifiAdapter;
use rudder_controller::app::control_loop::ControlLoop;
use rudder_controller::config::ControllerConfig;
use rudder_controller::drivers::hw_init;
use rudder_controller::drivers::indicator::IndicatorDriver;
use rudder_controller::drivers::ledc::LedcChannel;
use rudder_controller::drivers::watchdog::Watchdog;
use rudder_controller::sensors::potentiometer::PotSensor;
use rudder_controller::telemetry::sender::TelemetrySender;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Rudder Controller v{}            ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = ControllerConfig::default();
    config.validate()?;
    info!("Config: {}", serde_json::to_string(&config)?);

    let clock = Esp32TimeAdapter::new();
    let mut delay = IdleDelay;

    // ── 3. WiFi association (bounded) ─────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let driver = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
        sysloop,
    )?;

    let mut wifi = WifiAdapter::new(driver);
    wifi.set_credentials(&config.network.credentials)?;
    let ip = wifi.connect(config.network.retry_policy(), &clock, &mut delay)?;
    info!("Network ready: {} -> {}", ip, config.network.telemetry_addr());

    // ── 4. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals(&config)?;

    let sensor = PotSensor::new(config.pins.pot_adc1_channel);
    let channels = (0..config.indicator.mode.channel_count()).map(|i| LedcChannel::new(i as u32));
    let indicator = IndicatorDriver::new(config.indicator.mode, channels)?;
    let telemetry = TelemetrySender::new(UdpDatagram::bind(config.network.telemetry_addr())?);

    // ── 5. Control loop ───────────────────────────────────────
    let mut control = ControlLoop::new(&config, sensor, indicator, telemetry)?;
    let mut sink = LogEventSink::new();
    let watchdog = Watchdog::default();

    info!("System ready. Entering control loop.");
    control.start(&clock, &mut sink);
    control.run_forever(&clock, &mut delay, &mut sink, || watchdog.feed())
}
