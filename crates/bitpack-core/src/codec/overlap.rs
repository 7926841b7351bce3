//! Uniform-width packing into a continuous bitstream.
//!
//! Values are laid end to end, so a value may start in one word and finish
//! in the next. No bits are wasted except in the final word.

use bitpack_common::{CodecVariant, Result, WORD_BITS, Word};

use super::{
    BlockLayout, FixedBlock, Packer, check_index, check_output_len, ensure_non_empty,
    not_compressed,
};
use crate::bits::{BitReader, BitWriter};
use crate::width::width;

/// Fixed-width codec whose values may straddle two words.
#[derive(Debug, Clone, Default)]
pub struct OverlapPacker {
    block: Option<FixedBlock>,
}

impl OverlapPacker {
    /// Creates an empty codec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of words needed for `len` values at `bit_width` bits each.
    #[must_use]
    pub fn packed_words(len: usize, bit_width: u32) -> usize {
        (len * bit_width as usize).div_ceil(WORD_BITS as usize)
    }

    /// Bits per value in the current block.
    #[must_use]
    pub fn bit_width(&self) -> Option<u32> {
        self.block.as_ref().map(|b| b.bit_width)
    }

    fn block(&self) -> Result<&FixedBlock> {
        self.block.as_ref().ok_or_else(not_compressed)
    }
}

impl Packer for OverlapPacker {
    fn variant(&self) -> CodecVariant {
        CodecVariant::Overlap
    }

    fn compress(&mut self, values: &[u32]) -> Result<()> {
        ensure_non_empty(values)?;
        let bit_width = width(values)?;

        let mut writer = BitWriter::with_words(Self::packed_words(values.len(), bit_width));
        for &value in values {
            writer.push(value, bit_width);
        }
        let words = writer.into_words();

        tracing::debug!(
            "overlap codec packed {} values at {} bits into {} words",
            values.len(),
            bit_width,
            words.len()
        );

        self.block = Some(FixedBlock {
            words,
            len: values.len(),
            bit_width,
        });
        Ok(())
    }

    fn decompress(&self, out: &mut [u32]) -> Result<()> {
        let block = self.block()?;
        check_output_len(out, block.len)?;

        let mut reader = BitReader::new(&block.words);
        for slot in out.iter_mut() {
            *slot = reader.pull(block.bit_width);
        }
        Ok(())
    }

    fn get(&self, index: usize) -> Result<u32> {
        let block = self.block()?;
        check_index(index, block.len)?;

        let pos = index * block.bit_width as usize;
        Ok(BitReader::at(&block.words, pos).pull(block.bit_width))
    }

    fn compressed_words(&self) -> &[Word] {
        match &self.block {
            Some(block) => &block.words,
            None => &[],
        }
    }

    fn original_len(&self) -> usize {
        self.block.as_ref().map_or(0, |b| b.len)
    }

    fn layout(&self) -> Option<BlockLayout> {
        self.bit_width()
            .map(|bit_width| BlockLayout::Fixed { bit_width })
    }
}
