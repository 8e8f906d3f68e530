//! Argument synthesizers for testing functions that take parameters.

use crate::random::RandomSource;

/// Upper bound of the outer draw in [`number_of_allocs`].
const ALLOC_EXPONENT_RANGE: u32 = 6000;

/// Allocation count for `schedulegc(n)` and `gczeal(level, n)`.
///
/// The exponent is drawn below a bound that is itself random, so small counts
/// dominate while counts up to about `e^6` stay reachable.
pub fn number_of_allocs(rng: &mut dyn RandomSource) -> u64 {
    let bound = rng.rnd(ALLOC_EXPONENT_RANGE);
    let exponent = rng.rnd(bound);
    (exponent as f64 / 1000.0).exp().floor() as u64
}

/// Slice budget for `startgc`/`gcslice`: `floor(2^(r * 32))`, anywhere from 1
/// to just under 2^32.
pub fn gc_slice_size(rng: &mut dyn RandomSource) -> u64 {
    2f64.powf(rng.float() * 32.0).floor() as u64
}

/// Optional trailing `'shrinking'` argument, present one time in five.
pub fn maybe_comma_shrinking(rng: &mut dyn RandomSource) -> &'static str {
    if rng.rnd(5) != 0 {
        ""
    } else {
        ", 'shrinking'"
    }
}
