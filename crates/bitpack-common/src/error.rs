//! Error types for bit-packing operations.
//!
//! Every failure is detected at the offending call and returned to the
//! caller. A failed operation never modifies the block held by a codec.

use thiserror::Error;

/// Error variants for codec operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The caller passed something the codec cannot work with: an empty
    /// input, a negative or oversized value, an output buffer of the wrong
    /// length, or an unknown codec tag.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The codec has no compressed block yet.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Random access outside `0..len`.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of elements in the compressed block.
        len: usize,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`].
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Shorthand for [`Error::IllegalState`].
    pub fn illegal_state(msg: impl Into<String>) -> Self {
        Self::IllegalState(msg.into())
    }
}

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
