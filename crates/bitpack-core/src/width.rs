//! Bit-width calculation.
//!
//! The width of a set of values is the smallest `b >= 1` such that every
//! value fits in `b` bits. Zero still takes one bit.

use bitpack_common::{Error, Result, WORD_BITS};

/// Returns the number of bits needed to represent `value` (at least 1).
#[inline]
#[must_use]
pub const fn bit_width(value: u32) -> u32 {
    if value == 0 {
        1
    } else {
        WORD_BITS - value.leading_zeros()
    }
}

/// Returns the minimal width that fits every value in `values`.
///
/// Fails with [`Error::InvalidArgument`] on an empty slice.
pub fn width(values: &[u32]) -> Result<u32> {
    let max = values
        .iter()
        .copied()
        .max()
        .ok_or_else(|| Error::invalid_argument("the array can't be empty"))?;
    Ok(bit_width(max))
}

/// Like [`width`], for callers holding signed data.
///
/// Fails with [`Error::InvalidArgument`] on an empty slice or on any value
/// outside `0..=u32::MAX`.
pub fn signed_width(values: &[i64]) -> Result<u32> {
    width(&to_unsigned(values)?)
}

/// Converts signed input into the codec value type.
///
/// Fails with [`Error::InvalidArgument`] on the first value that is
/// negative or does not fit in 32 bits. An empty slice converts to an empty
/// vector; emptiness is checked by the operation that consumes it.
pub fn to_unsigned(values: &[i64]) -> Result<Vec<u32>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            u32::try_from(v).map_err(|_| {
                if v < 0 {
                    Error::invalid_argument(format!("negative value {v} at index {i}"))
                } else {
                    Error::invalid_argument(format!("value {v} at index {i} exceeds 32 bits"))
                }
            })
        })
        .collect()
}
