//! Per-tag record lists kept in a [`BlobCache`].
//!
//! Each tag maps to one blob holding the encoded list of every value associated with
//! it. Mutations run a read-modify-write cycle over the whole list while holding a
//! single cache-wide lock. Readers take no lock; because a write encodes into a buffer
//! before committing it in one insert, a reader sees either the old list or the new
//! one.

use std::collections::HashSet;

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::blob::{BlobCache, BlobCacheConfig, MokaBlobCache, Ttl};
use super::error::{TagCacheError, TagCacheResult};
use crate::codec;
use crate::model::Entry;

/// Bounded cache of per-tag record lists.
pub struct TagCache<B: BlobCache = MokaBlobCache> {
    blobs: B,
    write_lock: Mutex<()>,
}

impl TagCache<MokaBlobCache> {
    /// Creates a tag cache over a new [`MokaBlobCache`].
    pub fn with_config(config: BlobCacheConfig) -> Self {
        Self::new(MokaBlobCache::with_config(config))
    }
}

impl<B: BlobCache> TagCache<B> {
    /// Wraps an existing blob cache.
    pub fn new(blobs: B) -> Self {
        Self {
            blobs,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the underlying blob cache.
    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Returns every cached entry for `tags`.
    ///
    /// Tags absent from the cache contribute nothing. A present but undecodable list
    /// fails the whole call. Repeated tags are read once.
    pub fn get<S: AsRef<str>>(&self, tags: &[S]) -> TagCacheResult<Vec<Entry>> {
        let mut seen = HashSet::with_capacity(tags.len());
        let mut entries = Vec::new();

        for tag in tags.iter().map(AsRef::as_ref) {
            if !seen.insert(tag) {
                continue;
            }

            let Some(reader) = self.blobs.get(tag) else {
                continue;
            };

            let tag_entries = self.decode(tag, reader)?;
            entries.extend(tag_entries);
        }

        Ok(entries)
    }

    /// Adds `entry` to its tag's list, or updates the tag index if the value is
    /// already listed.
    pub fn set(&self, entry: &Entry) -> TagCacheResult<()> {
        self.with_tag_entries(&entry.tag, |entries| {
            match entries.iter_mut().find(|e| e.same_pair(entry)) {
                Some(existing) => existing.tag_index = entry.tag_index,
                None => entries.push(entry.clone()),
            }
            true
        })
    }

    /// Removes `value` from `tag`'s list. Missing tags and values are a no-op.
    pub fn remove(&self, value: &str, tag: &str) -> TagCacheResult<()> {
        self.with_tag_entries(tag, |entries| {
            let before = entries.len();
            entries.retain(|e| e.value != value);
            entries.len() != before
        })
    }

    /// Evicts `tag`'s whole list. Always succeeds.
    pub fn delete(&self, tag: &str) {
        let _guard = self.write_lock.lock();
        self.blobs.delete(tag);
        debug!(tag = tag, "Evicted tag from cache");
    }

    /// Releases the blob cache.
    pub fn close(&self) {
        let _guard = self.write_lock.lock();
        self.blobs.close();
    }

    fn decode<R: std::io::Read>(&self, tag: &str, reader: R) -> TagCacheResult<Vec<Entry>> {
        codec::decode(reader, tag).map_err(|e| {
            let err = TagCacheError::from_codec(tag, e);
            if matches!(err, TagCacheError::DamagedData { .. }) {
                warn!(tag = tag, error = %err, "Damaged cache data");
            }
            err
        })
    }

    /// Runs `op` over `tag`'s decoded list under the write lock and stores the result
    /// if `op` reports a change.
    ///
    /// A refused write evicts the tag, so a stale list never stands in for the
    /// complete one and the next read goes back to the index.
    fn with_tag_entries<F>(&self, tag: &str, op: F) -> TagCacheResult<()>
    where
        F: FnOnce(&mut Vec<Entry>) -> bool,
    {
        let _guard = self.write_lock.lock();

        let mut entries = match self.blobs.get(tag) {
            Some(reader) => self.decode(tag, reader)?,
            None => Vec::new(),
        };

        if !op(&mut entries) {
            return Ok(());
        }

        let encoded =
            codec::encode_to_vec(&entries).map_err(|e| TagCacheError::from_codec(tag, e))?;
        let size = encoded.len();

        self.blobs
            .insert(tag, encoded, Ttl::Forever)
            .map_err(|refusal| {
                self.blobs.delete(tag);
                warn!(tag = tag, size = size, %refusal, "Blob cache refused tag list, evicted tag");
                TagCacheError::FailedToCache {
                    tag: tag.to_string(),
                    refusal,
                }
            })
    }
}

impl<B: BlobCache + std::fmt::Debug> std::fmt::Debug for TagCache<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagCache")
            .field("blobs", &self.blobs)
            .finish_non_exhaustive()
    }
}
