//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements        | Connects to               |
//! |------------|-------------------|---------------------------|
//! | `log_sink` | EventSink         | Serial log output         |
//! | `time`     | ClockPort         | ESP32 system timer        |
//! |            | DelayNs           | FreeRTOS task delay       |
//! | `udp`      | DatagramPort      | lwIP UDP socket           |
//! | `wifi`     | (startup only)    | ESP-IDF WiFi STA          |
//!
//! The potentiometer (`SensorPort`) and the LEDC channels (`SetDutyCycle`)
//! live with the other hardware drivers in `sensors` and `drivers`.

pub mod log_sink;
pub mod time;
pub mod udp;
pub mod wifi;
