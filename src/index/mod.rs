//! Authoritative tag index.
//!
//! The [`PersistentIndex`] trait is the seam between the matching engine and whatever
//! durable store holds the full set of value-tag associations. Two implementations
//! ship with the crate:
//!
//! - [`RedbIndex`]: durable, file-backed, supports reverse lookup.
//! - [`MemoryIndex`]: in-process, supports reverse lookup.
//!
//! # Reverse Lookup
//!
//! Listing the tags of a value is optional. An index advertises it through
//! [`PersistentIndex::REVERSE_LOOKUP`]; the engine reports
//! [`NotSupported`](crate::TagStashError::NotSupported) without calling
//! [`PersistentIndex::get_tags`] when the flag is `false`.

pub mod error;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{IndexError, IndexResult};
pub use memory::MemoryIndex;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockIndex;
pub use store::RedbIndex;

use std::future::Future;

use crate::model::Entry;

/// Durable many-to-many store of value-tag associations.
///
/// `(value, tag)` pairs are unique: [`set`](PersistentIndex::set) upserts, overwriting
/// the stored tag index.
pub trait PersistentIndex: Send + Sync {
    /// Whether [`get_tags`](PersistentIndex::get_tags) is implemented.
    const REVERSE_LOOKUP: bool = false;

    /// Returns every entry whose tag is one of `tags`.
    fn get(&self, tags: &[String]) -> impl Future<Output = IndexResult<Vec<Entry>>> + Send;

    /// Stores or updates one association.
    fn set(&self, entry: &Entry) -> impl Future<Output = IndexResult<()>> + Send;

    /// Deletes one association. Missing associations are a no-op.
    fn remove(&self, value: &str, tag: &str) -> impl Future<Output = IndexResult<()>> + Send;

    /// Deletes every association of `tag`.
    fn delete(&self, tag: &str) -> impl Future<Output = IndexResult<()>> + Send;

    /// Returns the tags associated with `value`, ordered by tag index.
    fn get_tags(&self, _value: &str) -> impl Future<Output = IndexResult<Vec<String>>> + Send {
        async { Err(IndexError::Unsupported) }
    }

    /// Releases resources held by the index.
    fn close(&self) {}
}
