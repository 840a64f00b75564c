//! Indicator control: range mapping and deadzone classification.

pub mod deadzone;
pub mod mapping;
