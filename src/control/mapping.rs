//! Linear range mapping.
//!
//! Integer linear interpolation from one range onto another, with floor
//! division.  No clamping: an `x` outside `[in_min, in_max]` extrapolates,
//! so callers branch first and only map values inside the sub-range.

/// Map `x` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Computes `floor((x - in_min) * (out_max - out_min) / (in_max - in_min)) + out_min`
/// in `i64`, so full 16-bit ranges never overflow.  Reversed output ranges
/// (`out_min > out_max`) produce an inverted ramp.
///
/// `in_min` and `in_max` must differ.
pub fn map_range(x: i64, in_min: i64, in_max: i64, out_min: i64, out_max: i64) -> i64 {
    debug_assert_ne!(in_min, in_max, "degenerate input range");
    floor_div((x - in_min) * (out_max - out_min), in_max - in_min) + out_min
}

/// Division rounding toward negative infinity.
fn floor_div(num: i64, den: i64) -> i64 {
    let q = num / den;
    if num % den != 0 && ((num < 0) != (den < 0)) {
        q - 1
    } else {
        q
    }
}
