//! Application core: the control loop and its port boundary.
//!
//! The loop itself never touches hardware: sensors, sockets, clocks and
//! log output reach it through the **port traits** in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod control_loop;
pub mod events;
pub mod ports;
