//! The three packing schemes behind one interface.
//!
//! Every codec owns at most one compressed block. `compress` builds a new
//! block and swaps it in only once it is complete, so a failing call leaves
//! the previous block untouched.
//!
//! # Supported Codecs
//!
//! | Codec | Words for `n` values at `b` bits | Random access |
//! |-------|----------------------------------|---------------|
//! | [`OverlapPacker`] | `ceil(n * b / 32)` | O(1) |
//! | [`AlignedPacker`] | `ceil(n / floor(32 / b))` | O(1) |
//! | [`OverflowPacker`] | flag + regular/index fields + overflow area | full decode |

mod aligned;
mod overflow;
mod overlap;

pub use aligned::AlignedPacker;
pub use overflow::{OverflowPacker, OverflowPolicy};
pub use overlap::OverlapPacker;

use bitpack_common::{CodecVariant, Error, Result, Word};

use crate::width::to_unsigned;

/// Width metadata of a compressed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLayout {
    /// Every value packed at the same width.
    Fixed {
        /// Bits per value.
        bit_width: u32,
    },
    /// Flagged regular values plus a trailing overflow area.
    Overflow {
        /// Bits per regular value (0 when every value overflows).
        regular_width: u32,
        /// Bits per value in the overflow area.
        overflow_width: u32,
        /// Bits per overflow reference.
        index_width: u32,
        /// Number of overflow occurrences, duplicates included.
        overflow_count: usize,
    },
}

/// Capability surface shared by every codec.
pub trait Packer {
    /// Returns which scheme this codec implements.
    fn variant(&self) -> CodecVariant;

    /// Compresses `values`, replacing any previous block.
    ///
    /// Fails with [`Error::InvalidArgument`] on an empty slice.
    fn compress(&mut self, values: &[u32]) -> Result<()>;

    /// Compresses signed input after checking every value fits in `u32`.
    fn compress_signed(&mut self, values: &[i64]) -> Result<()> {
        let values = to_unsigned(values)?;
        self.compress(&values)
    }

    /// Decodes the whole block into `out`, which must be exactly
    /// [`original_len`](Packer::original_len) long.
    fn decompress(&self, out: &mut [u32]) -> Result<()>;

    /// Decodes the whole block into a new vector.
    fn decompress_to_vec(&self) -> Result<Vec<u32>> {
        let mut out = vec![0; self.original_len()];
        self.decompress(&mut out)?;
        Ok(out)
    }

    /// Decodes the element at `index`.
    fn get(&self, index: usize) -> Result<u32>;

    /// The packed word buffer; empty before the first `compress`.
    fn compressed_words(&self) -> &[Word];

    /// Number of values in the current block; 0 before the first `compress`.
    fn original_len(&self) -> usize;

    /// Width metadata of the current block.
    fn layout(&self) -> Option<BlockLayout>;

    /// Returns whether a block is present.
    fn is_compressed(&self) -> bool {
        self.layout().is_some()
    }

    /// Compressed size over original size, both counted in 32-bit words.
    ///
    /// Lower is better; `0.25` means the block takes a quarter of the
    /// space of the input.
    fn compression_ratio(&self) -> Option<f64> {
        if !self.is_compressed() {
            return None;
        }
        Some(self.compressed_words().len() as f64 / self.original_len() as f64)
    }
}

/// A codec of any of the three kinds.
#[derive(Debug, Clone)]
pub enum Codec {
    /// See [`OverlapPacker`].
    Overlap(OverlapPacker),
    /// See [`AlignedPacker`].
    NonOverlap(AlignedPacker),
    /// See [`OverflowPacker`].
    OverflowArea(OverflowPacker),
}

macro_rules! dispatch {
    ($codec:expr, $packer:ident => $body:expr) => {
        match $codec {
            Codec::Overlap($packer) => $body,
            Codec::NonOverlap($packer) => $body,
            Codec::OverflowArea($packer) => $body,
        }
    };
}

impl Codec {
    /// Creates an empty codec of the given kind with default settings.
    #[must_use]
    pub fn new(variant: CodecVariant) -> Self {
        match variant {
            CodecVariant::Overlap => Self::Overlap(OverlapPacker::new()),
            CodecVariant::NonOverlap => Self::NonOverlap(AlignedPacker::new()),
            CodecVariant::OverflowArea => Self::OverflowArea(OverflowPacker::new()),
        }
    }
}

impl Packer for Codec {
    fn variant(&self) -> CodecVariant {
        dispatch!(self, p => p.variant())
    }

    fn compress(&mut self, values: &[u32]) -> Result<()> {
        dispatch!(self, p => p.compress(values))
    }

    fn decompress(&self, out: &mut [u32]) -> Result<()> {
        dispatch!(self, p => p.decompress(out))
    }

    fn get(&self, index: usize) -> Result<u32> {
        dispatch!(self, p => p.get(index))
    }

    fn compressed_words(&self) -> &[Word] {
        dispatch!(self, p => p.compressed_words())
    }

    fn original_len(&self) -> usize {
        dispatch!(self, p => p.original_len())
    }

    fn layout(&self) -> Option<BlockLayout> {
        dispatch!(self, p => p.layout())
    }
}

impl From<OverlapPacker> for Codec {
    fn from(packer: OverlapPacker) -> Self {
        Self::Overlap(packer)
    }
}

impl From<AlignedPacker> for Codec {
    fn from(packer: AlignedPacker) -> Self {
        Self::NonOverlap(packer)
    }
}

impl From<OverflowPacker> for Codec {
    fn from(packer: OverflowPacker) -> Self {
        Self::OverflowArea(packer)
    }
}

/// Block shared by the two uniform-width codecs.
#[derive(Debug, Clone)]
pub(crate) struct FixedBlock {
    pub(crate) words: Vec<Word>,
    pub(crate) len: usize,
    pub(crate) bit_width: u32,
}

pub(crate) fn ensure_non_empty(values: &[u32]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::invalid_argument("the array can't be empty"));
    }
    Ok(())
}

pub(crate) fn not_compressed() -> Error {
    Error::illegal_state("nothing has been compressed yet")
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(Error::IndexOutOfBounds { index, len });
    }
    Ok(())
}

pub(crate) fn check_output_len(out: &[u32], len: usize) -> Result<()> {
    if out.len() != len {
        return Err(Error::invalid_argument(format!(
            "output length {} does not match original length {len}",
            out.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [u32; 7] = [1, 2, 3, 1024, 4, 5, 2048];

    #[test]
    fn test_codec_new_matches_variant() {
        for variant in CodecVariant::ALL {
            let codec = Codec::new(variant);
            assert_eq!(codec.variant(), variant);
            assert!(!codec.is_compressed());
            assert_eq!(codec.original_len(), 0);
            assert!(codec.compressed_words().is_empty());
            assert_eq!(codec.layout(), None);
            assert_eq!(codec.compression_ratio(), None);
        }
    }

    #[test]
    fn test_codec_roundtrip_every_variant() {
        for variant in CodecVariant::ALL {
            let mut codec = Codec::new(variant);
            codec.compress(&SAMPLE).unwrap();

            assert_eq!(codec.original_len(), SAMPLE.len());
            assert_eq!(codec.decompress_to_vec().unwrap(), SAMPLE, "{variant}");
            for (i, &expected) in SAMPLE.iter().enumerate() {
                assert_eq!(codec.get(i).unwrap(), expected, "{variant} index {i}");
            }
        }
    }

    #[test]
    fn test_codec_errors_before_compress() {
        for variant in CodecVariant::ALL {
            let codec = Codec::new(variant);
            assert!(matches!(
                codec.decompress(&mut []),
                Err(Error::IllegalState(_))
            ));
            assert!(matches!(
                codec.decompress_to_vec(),
                Err(Error::IllegalState(_))
            ));
            assert!(matches!(codec.get(0), Err(Error::IllegalState(_))));
        }
    }

    #[test]
    fn test_codec_invalid_input() {
        for variant in CodecVariant::ALL {
            let mut codec = Codec::new(variant);
            assert!(matches!(
                codec.compress(&[]),
                Err(Error::InvalidArgument(_))
            ));
            assert!(matches!(
                codec.compress_signed(&[-1, 2, 3]),
                Err(Error::InvalidArgument(_))
            ));
            assert!(!codec.is_compressed());
        }
    }

    #[test]
    fn test_codec_output_and_index_checks() {
        for variant in CodecVariant::ALL {
            let mut codec = Codec::new(variant);
            codec.compress(&[100, 200, 300, 400, 500]).unwrap();

            let mut short = [0u32; 4];
            assert!(matches!(
                codec.decompress(&mut short),
                Err(Error::InvalidArgument(_))
            ));
            assert_eq!(
                codec.get(5),
                Err(Error::IndexOutOfBounds { index: 5, len: 5 })
            );
        }
    }

    #[test]
    fn test_failed_compress_keeps_previous_block() {
        for variant in CodecVariant::ALL {
            let mut codec = Codec::new(variant);
            codec.compress(&SAMPLE).unwrap();
            let words = codec.compressed_words().to_vec();

            assert!(codec.compress(&[]).is_err());
            assert!(codec.compress_signed(&[1, -5]).is_err());

            assert_eq!(codec.compressed_words(), words.as_slice());
            assert_eq!(codec.decompress_to_vec().unwrap(), SAMPLE);
        }
    }

    #[test]
    fn test_compress_replaces_block() {
        for variant in CodecVariant::ALL {
            let mut codec = Codec::new(variant);
            codec.compress(&SAMPLE).unwrap();
            codec.compress(&[9, 8]).unwrap();

            assert_eq!(codec.original_len(), 2);
            assert_eq!(codec.decompress_to_vec().unwrap(), vec![9, 8]);
            assert_eq!(
                codec.get(2),
                Err(Error::IndexOutOfBounds { index: 2, len: 2 })
            );
        }
    }

    #[test]
    fn test_compress_signed_accepts_non_negative() {
        for variant in CodecVariant::ALL {
            let mut codec = Codec::new(variant);
            codec.compress_signed(&[0, 7, 4_000_000_000]).unwrap();
            assert_eq!(
                codec.decompress_to_vec().unwrap(),
                vec![0, 7, 4_000_000_000]
            );
        }
    }

    #[test]
    fn test_compression_ratio() {
        let values: Vec<u32> = (0..64).map(|i| i % 8).collect();
        let mut codec = Codec::new(CodecVariant::Overlap);
        codec.compress(&values).unwrap();

        // 64 values at 3 bits = 6 words
        assert_eq!(codec.compressed_words().len(), 6);
        let ratio = codec.compression_ratio().unwrap();
        assert!((ratio - 6.0 / 64.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_packers() {
        assert_eq!(
            Codec::from(OverlapPacker::new()).variant(),
            CodecVariant::Overlap
        );
        assert_eq!(
            Codec::from(AlignedPacker::new()).variant(),
            CodecVariant::NonOverlap
        );
        assert_eq!(
            Codec::from(OverflowPacker::new()).variant(),
            CodecVariant::OverflowArea
        );
    }
}
