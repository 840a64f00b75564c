//! Position indicator driver.
//!
//! Owns the one or three PWM channels of the LED indicator and writes a
//! fresh [`LevelSet`] to them every tick.  There is no
//! change detection: every channel is rewritten on every call.
//!
//! 16-bit levels are scaled onto each channel's native duty range, so the
//! same level set drives a 14-bit LEDC channel or a 16-bit simulated one.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::control::deadzone::{FULL_SCALE, IndicatorMode, LevelSet};
use crate::error::ActuatorError;

pub struct IndicatorDriver<P: SetDutyCycle> {
    mode: IndicatorMode,
    channels: heapless::Vec<P, 3>,
}

impl<P: SetDutyCycle> IndicatorDriver<P> {
    /// Take ownership of the PWM channels, in physical order
    /// (single LED, or low / dead / high).
    pub fn new(
        mode: IndicatorMode,
        channels: impl IntoIterator<Item = P>,
    ) -> Result<Self, ActuatorError> {
        let mut owned = heapless::Vec::new();
        let mut got = 0;
        for ch in channels {
            got += 1;
            // Overflow is reported as a count mismatch below.
            let _ = owned.push(ch);
        }
        let expected = mode.channel_count();
        if got != expected {
            return Err(ActuatorError::ChannelCountMismatch { expected, got });
        }
        Ok(Self {
            mode,
            channels: owned,
        })
    }

    pub fn mode(&self) -> IndicatorMode {
        self.mode
    }

    pub fn channels(&self) -> &[P] {
        &self.channels
    }

    /// Write every channel.  A failing channel is logged and skipped; the
    /// remaining channels are still written.
    pub fn apply(&mut self, levels: &LevelSet) {
        debug_assert_eq!(levels.channel_count(), self.channels.len());
        for (i, (ch, level)) in self.channels.iter_mut().zip(levels.channels()).enumerate() {
            if let Err(e) = ch.set_duty_cycle_fraction(level, FULL_SCALE) {
                warn!("indicator: channel {} duty write failed: {:?}", i, e);
            }
        }
    }

    /// Drive every channel dark.
    pub fn all_off(&mut self) {
        for (i, ch) in self.channels.iter_mut().enumerate() {
            if let Err(e) = ch.set_duty_cycle_fully_off() {
                warn!("indicator: channel {} off failed: {:?}", i, e);
            }
        }
    }
}
