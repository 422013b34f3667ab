use std::io;
use thiserror::Error;

use super::blob::Refusal;
use crate::codec::CodecError;

#[derive(Debug, Error)]
/// Errors returned by the tag cache.
pub enum TagCacheError {
    /// A cached record list for `tag` exists but cannot be decoded.
    #[error("damaged cache data for tag '{tag}': {reason}")]
    DamagedData {
        /// Tag whose record list is damaged.
        tag: String,
        /// Decoder message.
        reason: String,
    },

    /// The blob cache refused to store the record list for `tag`.
    #[error("failed to cache entry for tag '{tag}': {refusal}")]
    FailedToCache {
        /// Tag whose record list was refused.
        tag: String,
        /// Blob cache refusal reason.
        #[source]
        refusal: Refusal,
    },

    /// Reading or writing the record stream failed.
    #[error("cache I/O error for tag '{tag}': {source}")]
    Io {
        /// Tag being read or written.
        tag: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl TagCacheError {
    pub(crate) fn from_codec(tag: &str, err: CodecError) -> Self {
        match err {
            CodecError::Damaged { .. } => TagCacheError::DamagedData {
                tag: tag.to_string(),
                reason: err.to_string(),
            },
            CodecError::Io(source) => TagCacheError::Io {
                tag: tag.to_string(),
                source,
            },
        }
    }
}

/// Convenience result type for tag cache operations.
pub type TagCacheResult<T> = Result<T, TagCacheError>;
