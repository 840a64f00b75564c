//! Sensor drivers.

pub mod potentiometer;
