//! Rudder potentiometer driver.
//!
//! Reads the wiper voltage through an ADC1 one-shot channel and scales the
//! 12-bit result to the full 16-bit sample range by bit replication, so
//! full scale reads as exactly 65535.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use log::warn;

use crate::app::ports::SensorPort;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_POT_ADC: AtomicU16 = AtomicU16::new(0);

/// Inject the next simulated 12-bit ADC reading.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_pot_adc(raw: u16) {
    SIM_POT_ADC.store(raw & 0x0FFF, Ordering::Relaxed);
}

/// Scale a 12-bit ADC reading to 16 bits (`0xFFF` → `0xFFFF`).
pub const fn scale_12_to_16(raw: u16) -> u16 {
    let raw = raw & 0x0FFF;
    (raw << 4) | (raw >> 8)
}

pub struct PotSensor {
    adc_channel: u32,
    last: u16,
    failed_reads: u32,
}

impl PotSensor {
    pub fn new(adc_channel: u32) -> Self {
        Self {
            adc_channel,
            last: 0,
            failed_reads: 0,
        }
    }

    pub fn failed_reads(&self) -> u32 {
        self.failed_reads
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Option<u16> {
        hw_init::adc1_read(self.adc_channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Option<u16> {
        Some(SIM_POT_ADC.load(Ordering::Relaxed))
    }
}

impl SensorPort for PotSensor {
    /// Latest 16-bit sample.  A rejected ADC read repeats the previous
    /// sample rather than reporting full deflection.
    fn read(&mut self) -> u16 {
        match self.read_adc() {
            Some(raw) => self.last = scale_12_to_16(raw),
            None => {
                self.failed_reads = self.failed_reads.saturating_add(1);
                if self.failed_reads.is_power_of_two() {
                    warn!(
                        "pot: ADC1 CH{} read failed ({} total), holding {}",
                        self.adc_channel, self.failed_reads, self.last
                    );
                }
            }
        }
        self.last
    }
}
