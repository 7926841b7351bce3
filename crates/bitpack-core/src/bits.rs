//! MSB-first bit cursor over a buffer of 32-bit words.
//!
//! Bit position `p` lives in word `p / 32` at offset `p % 32`, counted from
//! the most significant bit. A field of up to 32 bits touches at most two
//! adjacent words; both [`BitWriter::push`] and [`BitReader::pull`] handle
//! the crossing by working on a 64-bit window over the pair.

use bitpack_common::{WORD_BITS, Word};

const WORD: usize = WORD_BITS as usize;

#[inline]
const fn low_mask(width: u32) -> u64 {
    (1u64 << width) - 1
}

/// Appends fixed-width fields to a word buffer.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    words: Vec<Word>,
    pos: usize,
}

impl BitWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer whose buffer already holds enough zeroed words for
    /// `bits` bits.
    #[must_use]
    pub fn with_capacity_bits(bits: usize) -> Self {
        Self::with_words(bits.div_ceil(WORD))
    }

    /// Creates a writer over `words` zeroed words.
    ///
    /// The buffer only grows if a push runs past its end, so layouts that
    /// leave trailing padding keep exactly this many words.
    #[must_use]
    pub fn with_words(words: usize) -> Self {
        Self {
            words: vec![0; words],
            pos: 0,
        }
    }

    /// Writes the low `width` bits of `value`, most significant bit first.
    ///
    /// Bits of `value` above `width` are ignored. A width of 0 writes nothing.
    pub fn push(&mut self, value: u32, width: u32) {
        debug_assert!(width <= WORD_BITS, "field wider than a word: {width}");
        if width == 0 {
            return;
        }

        let end = self.pos + width as usize;
        let needed = end.div_ceil(WORD);
        if self.words.len() < needed {
            self.words.resize(needed, 0);
        }

        let index = self.pos / WORD;
        let offset = (self.pos % WORD) as u32;
        let window = (u64::from(value) & low_mask(width)) << (64 - offset - width);

        self.words[index] |= (window >> 32) as Word;
        if offset + width > WORD_BITS {
            self.words[index + 1] |= window as Word;
        }
        self.pos = end;
    }

    /// Writes a single flag bit.
    #[inline]
    pub fn push_bit(&mut self, bit: bool) {
        self.push(u32::from(bit), 1);
    }

    /// Skips forward to the start of the next word, unless already there.
    pub fn align_to_word(&mut self) {
        self.pos = self.pos.next_multiple_of(WORD);
    }

    /// Current bit position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Consumes the writer and returns the word buffer.
    #[must_use]
    pub fn into_words(self) -> Vec<Word> {
        self.words
    }
}

/// Reads fixed-width fields from a word buffer.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    words: &'a [Word],
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a reader positioned at bit 0.
    #[must_use]
    pub fn new(words: &'a [Word]) -> Self {
        Self { words, pos: 0 }
    }

    /// Creates a reader positioned at bit `pos`.
    #[must_use]
    pub fn at(words: &'a [Word], pos: usize) -> Self {
        Self { words, pos }
    }

    /// Reads the next `width` bits as an unsigned value.
    ///
    /// Bits past the end of the buffer read as zero. A width of 0 reads
    /// nothing and returns 0.
    pub fn pull(&mut self, width: u32) -> u32 {
        debug_assert!(width <= WORD_BITS, "field wider than a word: {width}");
        if width == 0 {
            return 0;
        }

        let index = self.pos / WORD;
        let offset = (self.pos % WORD) as u32;
        let hi = self.words.get(index).copied().unwrap_or(0);
        let lo = if offset + width > WORD_BITS {
            self.words.get(index + 1).copied().unwrap_or(0)
        } else {
            0
        };
        let window = (u64::from(hi) << 32) | u64::from(lo);

        self.pos += width as usize;
        ((window >> (64 - offset - width)) & low_mask(width)) as u32
    }

    /// Reads a single flag bit.
    #[inline]
    pub fn pull_bit(&mut self) -> bool {
        self.pull(1) == 1
    }

    /// Moves to bit position `pos`.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Skips forward to the start of the next word, unless already there.
    pub fn align_to_word(&mut self) {
        self.pos = self.pos.next_multiple_of(WORD);
    }

    /// Current bit position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }
}
