use std::io;
use thiserror::Error;

use crate::cache::{Refusal, TagCacheError};
use crate::config::ConfigError;
use crate::index::IndexError;

#[derive(Debug, Error)]
/// Errors returned by [`TagStash`](super::TagStash) operations.
pub enum TagStashError {
    /// Cached data for `tag` exists but cannot be decoded.
    #[error("damaged data for tag '{tag}': {reason}")]
    DamagedData { tag: String, reason: String },

    /// The cache refused to store the record list for `tag`.
    #[error("failed to cache entry for tag '{tag}': {refusal}")]
    FailedToCache {
        tag: String,
        #[source]
        refusal: Refusal,
    },

    /// The persistent index cannot list the tags of a value.
    #[error("operation not supported by the persistent index")]
    NotSupported,

    /// Reading a cached record stream failed.
    #[error("cache I/O error for tag '{tag}': {source}")]
    CacheIo {
        tag: String,
        #[source]
        source: io::Error,
    },

    /// Error reported by the persistent index, passed through as is.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Invalid configuration when opening the default stack.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TagStashError {
    /// Returns `true` for undecodable cache content.
    pub fn is_damaged_data(&self) -> bool {
        matches!(self, TagStashError::DamagedData { .. })
    }

    /// Returns `true` when the cache refused a write.
    pub fn is_failed_to_cache(&self) -> bool {
        matches!(self, TagStashError::FailedToCache { .. })
    }
}

impl From<TagCacheError> for TagStashError {
    fn from(err: TagCacheError) -> Self {
        match err {
            TagCacheError::DamagedData { tag, reason } => TagStashError::DamagedData { tag, reason },
            TagCacheError::FailedToCache { tag, refusal } => {
                TagStashError::FailedToCache { tag, refusal }
            }
            TagCacheError::Io { tag, source } => TagStashError::CacheIo { tag, source },
        }
    }
}

/// Convenience result type for engine operations.
pub type TagStashResult<T> = Result<T, TagStashError>;
