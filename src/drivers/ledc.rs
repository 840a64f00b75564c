//! PWM channels for the indicator LEDs.
//!
//! [`LedcChannel`] drives one LEDC channel configured by `hw_init`;
//! [`SimPwm`] is the in-memory host stand-in.  Both implement
//! `embedded_hal::pwm::SetDutyCycle`, so the indicator driver never knows
//! which one it is talking to.

use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use crate::drivers::hw_init::{self, LedcError};
use crate::pins;

/// One LEDC channel on the shared 1 kHz indicator timer.
pub struct LedcChannel {
    channel: u32,
}

impl LedcChannel {
    /// Wrap an LEDC channel already configured by `hw_init::init_peripherals`.
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> u32 {
        self.channel
    }
}

impl ErrorType for LedcChannel {
    type Error = LedcError;
}

impl SetDutyCycle for LedcChannel {
    fn max_duty_cycle(&self) -> u16 {
        ((1u32 << pins::PWM_RESOLUTION_BITS) - 1) as u16
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), LedcError> {
        hw_init::ledc_set(self.channel, duty)
    }
}

/// In-memory PWM channel with full 16-bit resolution.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default, Clone)]
pub struct SimPwm {
    duty: u16,
    writes: u32,
}

#[cfg(not(target_os = "espidf"))]
impl SimPwm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duty(&self) -> u16 {
        self.duty
    }

    /// Number of duty writes so far.
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

#[cfg(not(target_os = "espidf"))]
impl ErrorType for SimPwm {
    type Error = core::convert::Infallible;
}

#[cfg(not(target_os = "espidf"))]
impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        u16::MAX
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        self.writes = self.writes.saturating_add(1);
        Ok(())
    }
}
