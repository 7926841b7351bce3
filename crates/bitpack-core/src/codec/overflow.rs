//! Adaptive-width packing with a trailing overflow area.
//!
//! A single large value would force a uniform codec to widen every slot.
//! Here each element instead starts with a flag bit:
//!
//! ```text
//! 0 | value (regular_width bits)      regular value, stored inline
//! 1 | index (index_width bits)        reference into the overflow area
//! ```
//!
//! After the flagged region comes the overflow area: every outlier at
//! `overflow_width` bits, in the order the outliers were met. Index `k`
//! in the flagged region points to the `k`-th overflow entry.
//!
//! Whether a value is regular depends only on its own bit width, so equal
//! values always land on the same side.
//!
//! Finding element `i` means walking the flags of everything before it, so
//! [`OverflowPacker::get`](Packer::get) decodes the whole block.

use serde::{Deserialize, Serialize};

use bitpack_common::{CodecVariant, Error, Result, WORD_BITS, Word};

use super::{BlockLayout, Packer, check_index, check_output_len, ensure_non_empty, not_compressed};
use crate::bits::{BitReader, BitWriter};
use crate::width::{bit_width, width};

/// How the overflow codec decides which values are outliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Try every cut-off below the maximum width and keep the one giving
    /// the fewest total bits. Ties go to the wider regular width.
    #[default]
    MinimizeBits,
    /// Only values as wide as the maximum overflow; everything narrower is
    /// regular.
    BelowMaxWidth,
}

#[derive(Debug, Clone)]
struct OverflowBlock {
    words: Vec<Word>,
    len: usize,
    regular_width: u32,
    overflow_width: u32,
    index_width: u32,
    overflow_count: usize,
}

impl OverflowBlock {
    fn overflow_area_start(&self) -> usize {
        let regular_count = self.len - self.overflow_count;
        self.len
            + regular_count * self.regular_width as usize
            + self.overflow_count * self.index_width as usize
    }
}

/// Bits needed to address `count` overflow entries.
fn index_width(count: usize) -> u32 {
    let last = count.saturating_sub(1);
    (usize::BITS - last.leading_zeros()).max(1)
}

/// Returns the widest bit width still treated as regular.
fn regular_limit(values: &[u32], overflow_width: u32, policy: OverflowPolicy) -> u32 {
    if policy == OverflowPolicy::BelowMaxWidth {
        return overflow_width - 1;
    }

    let mut histogram = [0usize; WORD_BITS as usize + 1];
    for &v in values {
        histogram[bit_width(v) as usize] += 1;
    }

    let n = values.len();
    let cost = |regular: usize, limit: u32| {
        let overflow = n - regular;
        n + regular * limit as usize
            + overflow * (index_width(overflow) + overflow_width) as usize
    };

    let mut best_limit = 0;
    let mut best_cost = cost(0, 0);
    let mut regular = 0;
    for limit in 1..overflow_width {
        let count = histogram[limit as usize];
        if count == 0 {
            continue;
        }
        regular += count;
        let total = cost(regular, limit);
        if total <= best_cost {
            best_cost = total;
            best_limit = limit;
        }
    }
    best_limit
}

/// Codec storing outliers at full width in a trailing overflow area.
#[derive(Debug, Clone, Default)]
pub struct OverflowPacker {
    policy: OverflowPolicy,
    block: Option<OverflowBlock>,
}

impl OverflowPacker {
    /// Creates an empty codec using [`OverflowPolicy::MinimizeBits`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty codec with the given outlier policy.
    #[must_use]
    pub fn with_policy(policy: OverflowPolicy) -> Self {
        Self {
            policy,
            block: None,
        }
    }

    /// The outlier policy used by `compress`.
    #[must_use]
    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Decodes only the overflow area, in encounter order.
    pub fn overflow_area(&self) -> Result<Vec<u32>> {
        let block = self.block()?;
        let mut reader = BitReader::at(&block.words, block.overflow_area_start());
        Ok((0..block.overflow_count)
            .map(|_| reader.pull(block.overflow_width))
            .collect())
    }

    fn block(&self) -> Result<&OverflowBlock> {
        self.block.as_ref().ok_or_else(not_compressed)
    }
}

impl Packer for OverflowPacker {
    fn variant(&self) -> CodecVariant {
        CodecVariant::OverflowArea
    }

    fn compress(&mut self, values: &[u32]) -> Result<()> {
        ensure_non_empty(values)?;
        let overflow_width = width(values)?;
        let limit = regular_limit(values, overflow_width, self.policy);
        let is_overflow = |v: u32| bit_width(v) > limit;

        let mut regular_width = 0;
        let mut overflow_count = 0;
        for &v in values {
            if is_overflow(v) {
                overflow_count += 1;
            } else {
                regular_width = regular_width.max(bit_width(v));
            }
        }
        let regular_count = values.len() - overflow_count;
        let index_width = index_width(overflow_count);
        if index_width > WORD_BITS {
            return Err(Error::invalid_argument(format!(
                "{overflow_count} overflow values cannot be indexed in one word"
            )));
        }

        let total_bits = values.len()
            + regular_count * regular_width as usize
            + overflow_count * (index_width + overflow_width) as usize;
        let mut writer = BitWriter::with_capacity_bits(total_bits);

        let mut next_index = 0u32;
        for &v in values {
            if is_overflow(v) {
                writer.push_bit(true);
                writer.push(next_index, index_width);
                next_index += 1;
            } else {
                writer.push_bit(false);
                writer.push(v, regular_width);
            }
        }
        for &v in values.iter().filter(|&&v| is_overflow(v)) {
            writer.push(v, overflow_width);
        }
        debug_assert_eq!(writer.position(), total_bits);
        let words = writer.into_words();

        tracing::trace!(
            "overflow codec classified {} regular and {} overflow values",
            regular_count,
            overflow_count
        );
        tracing::debug!(
            "overflow codec packed {} values (regular {} bits, overflow {} bits, index {} bits) into {} words",
            values.len(),
            regular_width,
            overflow_width,
            index_width,
            words.len()
        );

        self.block = Some(OverflowBlock {
            words,
            len: values.len(),
            regular_width,
            overflow_width,
            index_width,
            overflow_count,
        });
        Ok(())
    }

    fn decompress(&self, out: &mut [u32]) -> Result<()> {
        let block = self.block()?;
        check_output_len(out, block.len)?;

        let mut reader = BitReader::new(&block.words);
        let mut pending = Vec::with_capacity(block.overflow_count);
        for (i, slot) in out.iter_mut().enumerate() {
            if reader.pull_bit() {
                let index = reader.pull(block.index_width) as usize;
                debug_assert_eq!(index, pending.len());
                pending.push(i);
            } else {
                *slot = reader.pull(block.regular_width);
            }
        }

        debug_assert_eq!(reader.position(), block.overflow_area_start());
        for i in pending {
            out[i] = reader.pull(block.overflow_width);
        }
        Ok(())
    }

    /// Decodes the whole block and returns element `index`.
    fn get(&self, index: usize) -> Result<u32> {
        let block = self.block()?;
        check_index(index, block.len)?;

        let mut scratch = vec![0; block.len];
        self.decompress(&mut scratch)?;
        Ok(scratch[index])
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
        self.block.as_ref().map(|b| BlockLayout::Overflow {
            regular_width: b.regular_width,
            overflow_width: b.overflow_width,
            index_width: b.index_width,
            overflow_count: b.overflow_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [u32; 7] = [1, 2, 3, 1024, 4, 5, 2048];

    fn roundtrip(packer: &mut OverflowPacker, values: &[u32]) {
        packer.compress(values).unwrap();
        assert_eq!(packer.decompress_to_vec().unwrap(), values);
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(packer.get(i).unwrap(), v, "index {i}");
        }
    }

    #[test]
    fn test_outliers_move_to_overflow_area() {
        let mut packer = OverflowPacker::new();
        roundtrip(&mut packer, &SAMPLE);

        assert_eq!(packer.overflow_area().unwrap(), vec![1024, 2048]);
        assert_eq!(
            packer.layout(),
            Some(BlockLayout::Overflow {
                regular_width: 3,
                overflow_width: 12,
                index_width: 1,
                overflow_count: 2,
            })
        );
    }

    #[test]
    fn test_exact_bit_layout() {
        let mut packer = OverflowPacker::new();
        packer.compress(&SAMPLE).unwrap();

        // 0-001 0-010 0-011 1-0 0-100 0-101 1-1 | 1024 | 2048, 48 bits
        assert_eq!(packer.compressed_words(), &[0x1239_1740_u32, 0x0800_0000]);
    }

    #[test]
    fn test_below_max_width_policy() {
        let mut packer = OverflowPacker::with_policy(OverflowPolicy::BelowMaxWidth);
        roundtrip(&mut packer, &SAMPLE);

        // 1024 needs 11 bits, one fewer than 2048, so it stays regular
        assert_eq!(packer.overflow_area().unwrap(), vec![2048]);
        assert_eq!(
            packer.layout(),
            Some(BlockLayout::Overflow {
                regular_width: 11,
                overflow_width: 12,
                index_width: 1,
                overflow_count: 1,
            })
        );
        // 7 flags + 6 * 11 + 1 + 12 = 86 bits
        assert_eq!(packer.compressed_words().len(), 3);
    }

    #[test]
    fn test_policies_agree_on_single_outlier() {
        let values = [1, 2, 7];
        for policy in [OverflowPolicy::MinimizeBits, OverflowPolicy::BelowMaxWidth] {
            let mut packer = OverflowPacker::with_policy(policy);
            roundtrip(&mut packer, &values);
            assert_eq!(packer.overflow_area().unwrap(), vec![7], "{policy:?}");
            assert_eq!(packer.compressed_words().len(), 1);
        }
    }

    #[test]
    fn test_equal_values_share_classification() {
        let values = [5, 900, 3, 900, 900, 1, 900];
        let mut packer = OverflowPacker::new();
        roundtrip(&mut packer, &values);

        assert_eq!(packer.overflow_area().unwrap(), vec![900, 900, 900, 900]);
        assert!(matches!(
            packer.layout(),
            Some(BlockLayout::Overflow {
                overflow_count: 4,
                index_width: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_all_values_same_width() {
        // every value overflows; no regular region at all
        let values = [4, 5, 6, 7, 5];
        let mut packer = OverflowPacker::with_policy(OverflowPolicy::BelowMaxWidth);
        roundtrip(&mut packer, &values);

        assert_eq!(packer.overflow_area().unwrap(), values.to_vec());
        assert_eq!(
            packer.layout(),
            Some(BlockLayout::Overflow {
                regular_width: 0,
                overflow_width: 3,
                index_width: 3,
                overflow_count: 5,
            })
        );
    }

    #[test]
    fn test_single_value_and_zeros() {
        let mut packer = OverflowPacker::new();
        roundtrip(&mut packer, &[15]);
        roundtrip(&mut packer, &[0, 0, 0]);
        roundtrip(&mut packer, &[0, 1, 2, 3]);
        roundtrip(&mut packer, &[100, 200, 300, 400, 500, 600, 700, 800, 900]);
    }

    #[test]
    fn test_full_width_outliers() {
        let values = [3, u32::MAX, 0, 1, 1 << 31, 2];
        let mut packer = OverflowPacker::new();
        roundtrip(&mut packer, &values);
        assert_eq!(packer.overflow_area().unwrap(), vec![u32::MAX, 1 << 31]);
    }

    #[test]
    fn test_minimize_bits_never_loses_to_below_max_width() {
        let inputs: [&[u32]; 4] = [
            &SAMPLE,
            &[1, 2, 7],
            &[500, 3, 70_000, 2, 9, 1_000_000, 4, 6],
            &[8, 8, 8, 9, 9, 1 << 20],
        ];
        for values in inputs {
            let mut minimized = OverflowPacker::new();
            minimized.compress(values).unwrap();
            let mut literal = OverflowPacker::with_policy(OverflowPolicy::BelowMaxWidth);
            literal.compress(values).unwrap();
            assert!(
                minimized.compressed_words().len() <= literal.compressed_words().len(),
                "{values:?}"
            );
        }
    }

    #[test]
    fn test_index_width() {
        assert_eq!(index_width(1), 1);
        assert_eq!(index_width(2), 1);
        assert_eq!(index_width(3), 2);
        assert_eq!(index_width(4), 2);
        assert_eq!(index_width(5), 3);
        assert_eq!(index_width(1024), 10);
    }

    #[test]
    fn test_errors() {
        let mut packer = OverflowPacker::new();
        assert!(matches!(packer.get(0), Err(Error::IllegalState(_))));
        assert!(matches!(packer.overflow_area(), Err(Error::IllegalState(_))));
        assert!(matches!(
            packer.decompress(&mut []),
            Err(Error::IllegalState(_))
        ));
        assert!(matches!(packer.compress(&[]), Err(Error::InvalidArgument(_))));

        packer.compress(&SAMPLE).unwrap();
        assert_eq!(
            packer.get(7),
            Err(Error::IndexOutOfBounds { index: 7, len: 7 })
        );
        assert!(matches!(
            packer.decompress(&mut [0; 8]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&OverflowPolicy::BelowMaxWidth).unwrap();
        assert_eq!(json, "\"below_max_width\"");
        assert_eq!(OverflowPacker::new().policy(), OverflowPolicy::MinimizeBits);
    }
}
