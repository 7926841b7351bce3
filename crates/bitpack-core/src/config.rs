//! Codec configuration.
//!
//! A [`Config`] names the codec to build and carries the knobs that change
//! its layout. It deserializes from any serde format; missing fields take
//! their defaults.
//!
//! ```
//! use bitpack_core::{CodecVariant, Config, OverflowPolicy};
//!
//! let config = Config::new()
//!     .with_variant(CodecVariant::OverflowArea)
//!     .with_overflow_policy(OverflowPolicy::BelowMaxWidth);
//! assert_eq!(config.variant, CodecVariant::OverflowArea);
//! ```

use serde::{Deserialize, Serialize};

use bitpack_common::CodecVariant;

use crate::codec::OverflowPolicy;

/// Settings used by [`create_codec_from_config`](crate::create_codec_from_config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which packing scheme to build.
    pub variant: CodecVariant,
    /// Outlier selection for [`CodecVariant::OverflowArea`]; ignored by the
    /// other variants.
    pub overflow_policy: OverflowPolicy,
}

impl Config {
    /// Creates a config with default settings (overlap codec).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the codec variant.
    #[must_use]
    pub fn with_variant(mut self, variant: CodecVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Sets the overflow codec's outlier policy.
    #[must_use]
    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }
}
