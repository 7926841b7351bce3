//! Word layout constants and the codec variant tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Unit of the compressed buffer.
pub type Word = u32;

/// Number of bits in a [`Word`].
pub const WORD_BITS: u32 = Word::BITS;

/// Identifies one of the three packing schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecVariant {
    /// Uniform width, values may straddle two words.
    #[default]
    Overlap,
    /// Uniform width, every value sits inside a single word.
    NonOverlap,
    /// Small regular width plus a trailing full-width area for outliers.
    OverflowArea,
}

impl CodecVariant {
    /// All variants, in declaration order.
    pub const ALL: [CodecVariant; 3] = [Self::Overlap, Self::NonOverlap, Self::OverflowArea];

    /// Returns the canonical tag for this variant.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Overlap => "overlap",
            Self::NonOverlap => "non_overlap",
            Self::OverflowArea => "overflow_area",
        }
    }

    /// Returns whether `get` decodes a single element without touching the
    /// rest of the block.
    #[must_use]
    pub fn has_constant_time_get(&self) -> bool {
        !matches!(self, Self::OverflowArea)
    }
}

impl fmt::Display for CodecVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CodecVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_ascii_lowercase().replace('-', "_");
        match tag.as_str() {
            "overlap" => Ok(Self::Overlap),
            "non_overlap" => Ok(Self::NonOverlap),
            "overflow_area" => Ok(Self::OverflowArea),
            _ => Err(Error::invalid_argument(format!(
                "unknown codec variant: {s:?}"
            ))),
        }
    }
}
