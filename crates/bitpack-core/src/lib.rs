//! # bitpack-core
//!
//! Packs arrays of `u32` into a dense word buffer while keeping individual
//! elements addressable without decompressing everything.
//!
//! ## Modules
//!
//! - [`width`] - Minimal bit width of a value or a set of values
//! - [`bits`] - MSB-first bit writer and reader over 32-bit words
//! - [`codec`] - The three packing schemes and the [`Codec`] enum over them
//! - [`factory`] - Builds a [`Codec`] from a variant tag or a [`Config`]
//! - [`config`] - Codec configuration
//!
//! ## Choosing a codec
//!
//! | Variant | Layout | `get` cost |
//! |---------|--------|------------|
//! | Overlap | Uniform width, values may cross word boundaries | O(1) |
//! | NonOverlap | Uniform width, `32 mod b` bits wasted per word | O(1) |
//! | OverflowArea | Flag bit + small width, outliers in a trailing area | O(n) |
//!
//! ## Example
//!
//! ```
//! use bitpack_core::{create_codec, CodecVariant, Packer};
//!
//! let mut codec = create_codec(CodecVariant::Overlap);
//! codec.compress(&[1, 2, 3, 1024, 4, 5, 2048])?;
//!
//! assert_eq!(codec.get(3)?, 1024);
//! assert_eq!(codec.decompress_to_vec()?, vec![1, 2, 3, 1024, 4, 5, 2048]);
//! # Ok::<(), bitpack_common::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bits;
pub mod codec;
pub mod config;
pub mod factory;
pub mod width;

pub use bitpack_common::{CodecVariant, Error, Result, WORD_BITS, Word};
pub use bits::{BitReader, BitWriter};
pub use codec::{
    AlignedPacker, BlockLayout, Codec, OverflowPacker, OverflowPolicy, OverlapPacker, Packer,
};
pub use config::Config;
pub use factory::{create_codec, create_codec_by_name, create_codec_from_config};
pub use width::{bit_width, signed_width, to_unsigned, width};
