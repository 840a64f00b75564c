//! Fuzz target: `decode_sample`
//!
//! Feeds arbitrary datagrams to the telemetry decoder and asserts that it
//! never panics, accepts every datagram of at least two bytes, and
//! re-encodes each accepted sample to its leading two bytes.
//!
//! cargo fuzz run fuzz_telemetry_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use rudder_controller::telemetry::codec::{DATAGRAM_LEN, decode_sample, encode_sample};

fuzz_target!(|data: &[u8]| {
    match decode_sample(data) {
        Ok(sample) => {
            assert!(data.len() >= DATAGRAM_LEN);
            assert_eq!(&encode_sample(sample)[..], &data[..DATAGRAM_LEN]);
        }
        Err(_) => assert!(data.len() < DATAGRAM_LEN),
    }
});
