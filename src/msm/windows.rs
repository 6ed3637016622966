use num::{BigUint, Zero};
use std::borrow::Cow;

/// Maximum bit length over a scalar group; 0 for an all-zero or empty group.
/// Bounds the number of doubling rounds a windowed multiplication performs.
pub fn max_bit_length(scalars: &[BigUint]) -> usize {
    scalars.iter().map(|k| k.bits() as usize).max().unwrap_or(0)
}

/// Packs bit `bit` of each scalar into one integer: the k-th scalar's bit
/// lands at position k. The result is the table lookup key for this round.
pub fn window_index(scalars: &[BigUint], bit: u64) -> usize {
    scalars
        .iter()
        .enumerate()
        .fold(0, |idx, (k, scalar)| idx | ((scalar.bit(bit) as usize) << k))
}

/// Extends a short scalar slice with zeros up to `len`. Callers are allowed
/// to pass fewer scalars than a table or chunk covers; this is the one place
/// that padding happens. Borrows when the input is already long enough.
pub fn pad_scalars(scalars: &[BigUint], len: usize) -> Cow<'_, [BigUint]> {
    if scalars.len() >= len {
        Cow::Borrowed(scalars)
    } else {
        let mut padded = scalars.to_vec();
        padded.resize(len, BigUint::zero());
        Cow::Owned(padded)
    }
}
