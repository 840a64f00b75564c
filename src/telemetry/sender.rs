//! Best-effort telemetry sender.
//!
//! One sample, one datagram, one attempt.  Failures are returned to the
//! caller as a [`TelemetryError`] and never retried or buffered; a missed
//! sample is simply lost.

use super::codec::{DATAGRAM_LEN, encode_sample};
use crate::app::ports::DatagramPort;
use crate::error::TelemetryError;

pub struct TelemetrySender<D: DatagramPort> {
    port: D,
}

impl<D: DatagramPort> TelemetrySender<D> {
    pub fn new(port: D) -> Self {
        Self { port }
    }

    pub fn port(&self) -> &D {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut D {
        &mut self.port
    }

    /// Attempt to send `sample`.  A short write counts as a failure.
    pub fn send(&mut self, sample: u16) -> Result<(), TelemetryError> {
        let frame = encode_sample(sample);
        let sent = self.port.send(&frame)?;
        if sent != DATAGRAM_LEN {
            return Err(TelemetryError::Truncated { sent });
        }
        Ok(())
    }
}
