//! Fuzz target: `Classifier::levels`
//!
//! Builds a classifier from arbitrary deadzone bounds and intensity, then
//! classifies an arbitrary sample.  Asserts no panic (including the
//! degenerate-range debug assertion in `map_range`) and that the three-LED
//! output never lights more than one channel.
//!
//! cargo fuzz run fuzz_classifier

#![no_main]

use libfuzzer_sys::fuzz_target;
use rudder_controller::control::deadzone::{Classifier, Deadzone, IndicatorMode};

fuzz_target!(|data: &[u8]| {
    let [a0, a1, b0, b1, d0, d1, s0, s1, ..] = *data else {
        return;
    };
    let Ok(deadzone) = Deadzone::new(
        u16::from_le_bytes([a0, a1]),
        u16::from_le_bytes([b0, b1]),
    ) else {
        return;
    };
    let dead = u16::from_le_bytes([d0, d1]);
    let sample = u16::from_le_bytes([s0, s1]);

    let single = Classifier::new(deadzone, IndicatorMode::Single, dead);
    let _ = single.levels(sample);

    let triple = Classifier::new(deadzone, IndicatorMode::Triple, dead).triple_levels(sample);
    assert!(triple.lit_count() <= 1);
});
