//! Uniform-width packing with every value kept inside one word.
//!
//! Each word holds `floor(32 / b)` values; the remaining `32 mod b` low bits
//! of the word stay zero. Value `i` sits in word `i / per_word` at bit
//! offset `(i % per_word) * b`.

use bitpack_common::{CodecVariant, Result, WORD_BITS, Word};

use super::{
    BlockLayout, FixedBlock, Packer, check_index, check_output_len, ensure_non_empty,
    not_compressed,
};
use crate::bits::{BitReader, BitWriter};
use crate::width::width;

/// Fixed-width codec that never splits a value across words.
#[derive(Debug, Clone, Default)]
pub struct AlignedPacker {
    block: Option<FixedBlock>,
}

impl AlignedPacker {
    /// Creates an empty codec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `bit_width`-bit values that fit in one word.
    #[must_use]
    pub fn values_per_word(bit_width: u32) -> usize {
        (WORD_BITS / bit_width) as usize
    }

    /// Number of words needed for `len` values at `bit_width` bits each.
    #[must_use]
    pub fn packed_words(len: usize, bit_width: u32) -> usize {
        len.div_ceil(Self::values_per_word(bit_width))
    }

    /// Bits per value in the current block.
    #[must_use]
    pub fn bit_width(&self) -> Option<u32> {
        self.block.as_ref().map(|b| b.bit_width)
    }

    /// Bits left unused in each full word of the current block.
    #[must_use]
    pub fn wasted_bits_per_word(&self) -> Option<u32> {
        self.bit_width().map(|b| WORD_BITS % b)
    }

    fn block(&self) -> Result<&FixedBlock> {
        self.block.as_ref().ok_or_else(not_compressed)
    }
}

impl Packer for AlignedPacker {
    fn variant(&self) -> CodecVariant {
        CodecVariant::NonOverlap
    }

    fn compress(&mut self, values: &[u32]) -> Result<()> {
        ensure_non_empty(values)?;
        let bit_width = width(values)?;
        let per_word = Self::values_per_word(bit_width);

        let mut writer = BitWriter::with_words(Self::packed_words(values.len(), bit_width));
        for (i, &value) in values.iter().enumerate() {
            if i > 0 && i % per_word == 0 {
                writer.align_to_word();
            }
            writer.push(value, bit_width);
        }
        let words = writer.into_words();

        tracing::debug!(
            "non-overlap codec packed {} values at {} bits ({} per word) into {} words",
            values.len(),
            bit_width,
            per_word,
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

        let per_word = Self::values_per_word(block.bit_width);
        let mut reader = BitReader::new(&block.words);
        for (i, slot) in out.iter_mut().enumerate() {
            if i > 0 && i % per_word == 0 {
                reader.align_to_word();
            }
            *slot = reader.pull(block.bit_width);
        }
        Ok(())
    }

    fn get(&self, index: usize) -> Result<u32> {
        let block = self.block()?;
        check_index(index, block.len)?;

        let per_word = Self::values_per_word(block.bit_width);
        let word = index / per_word;
        let offset = (index % per_word) * block.bit_width as usize;
        let pos = word * WORD_BITS as usize + offset;
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
