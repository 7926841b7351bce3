//! # bitpack-common
//!
//! Foundation layer for Bitpack: errors, word constants, and codec identifiers.
//!
//! This crate has no internal dependencies and should be kept minimal. The
//! codecs themselves live in `bitpack-core`.
//!
//! ## Modules
//!
//! - [`error`] - The error taxonomy shared by every codec operation
//! - [`types`] - Word type, word width, and the [`CodecVariant`] tag

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{CodecVariant, WORD_BITS, Word};
