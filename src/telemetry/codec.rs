//! Telemetry datagram codec.
//!
//! Wire format:
//! ```text
//! ┌────────────────────┐
//! │ Sample (2B, LE u16)│
//! └────────────────────┘
//! ```
//!
//! No header, sequence number or checksum: one datagram carries exactly one
//! raw potentiometer sample.

use crate::error::TelemetryError;

/// Datagram length in bytes.
pub const DATAGRAM_LEN: usize = 2;

/// Encode one sample as a telemetry datagram.
pub const fn encode_sample(sample: u16) -> [u8; DATAGRAM_LEN] {
    sample.to_le_bytes()
}

/// Decode a received datagram.  The sample is the first two bytes; any
/// trailing bytes are ignored, and a datagram shorter than two bytes is
/// rejected.
pub fn decode_sample(datagram: &[u8]) -> Result<u16, TelemetryError> {
    match *datagram {
        [lo, hi, ..] => Ok(u16::from_le_bytes([lo, hi])),
        _ => Err(TelemetryError::Malformed {
            len: datagram.len(),
        }),
    }
}
