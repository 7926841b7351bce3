//! Codec construction.

use bitpack_common::{CodecVariant, Result};

use crate::codec::{Codec, OverflowPacker};
use crate::config::Config;

/// Creates an empty codec of the given kind with default settings.
#[must_use]
pub fn create_codec(variant: CodecVariant) -> Codec {
    Codec::new(variant)
}

/// Creates an empty codec from a textual tag such as `"non_overlap"`.
///
/// Fails with [`Error::InvalidArgument`](bitpack_common::Error::InvalidArgument)
/// on an unrecognized tag.
pub fn create_codec_by_name(name: &str) -> Result<Codec> {
    Ok(create_codec(name.parse()?))
}

/// Creates an empty codec as described by `config`.
#[must_use]
pub fn create_codec_from_config(config: &Config) -> Codec {
    match config.variant {
        CodecVariant::OverflowArea => {
            OverflowPacker::with_policy(config.overflow_policy).into()
        }
        variant => create_codec(variant),
    }
}
