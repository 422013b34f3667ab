//! Byte-capacity bounded blob cache.
//!
//! [`MokaBlobCache`] stores opaque byte blobs keyed by string. Every blob is weighed in
//! whole chunks (see [`chunked_weight`]) and the cache evicts to stay under its total
//! byte capacity. A blob that could never fit, because its weight alone exceeds the
//! capacity, is refused at insert time instead of being admitted and evicted.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use thiserror::Error;

use crate::constants::{
    DEFAULT_CACHE_SIZE, DEFAULT_EXPECTED_ITEM_SIZE, MIN_EXPECTED_ITEM_SIZE, chunked_weight,
};

/// How long a blob may live before it expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// Never expires; the blob leaves the cache only by eviction or deletion.
    #[default]
    Forever,
    /// Expires after the given duration.
    After(Duration),
}

impl Ttl {
    /// Returns the expiry duration, or `None` for [`Ttl::Forever`].
    #[inline]
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Ttl::Forever => None,
            Ttl::After(d) => Some(*d),
        }
    }
}

/// Why the blob cache refused an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Refusal {
    /// The blob's weight exceeds the total capacity.
    #[error("blob of weight {weight} exceeds cache capacity {capacity}")]
    Oversize {
        /// Chunk-rounded weight of key + blob.
        weight: u64,
        /// Configured total capacity.
        capacity: u64,
    },

    /// The cache has been closed.
    #[error("blob cache is closed")]
    Closed,
}

/// Sizing for a blob cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobCacheConfig {
    /// Total byte capacity.
    pub capacity: u64,
    /// Expected item size; used as the weighing chunk. Clamped to
    /// [`MIN_EXPECTED_ITEM_SIZE`].
    pub expected_item_size: u64,
}

impl Default for BlobCacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_SIZE,
            expected_item_size: DEFAULT_EXPECTED_ITEM_SIZE,
        }
    }
}

impl BlobCacheConfig {
    /// Creates a config with a total capacity and the default item size.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Sets the expected item size hint.
    pub fn expected_item_size(mut self, size: u64) -> Self {
        self.expected_item_size = size;
        self
    }

    /// Returns the chunk size actually used for weighing.
    #[inline]
    pub fn chunk_size(&self) -> u64 {
        self.expected_item_size.max(MIN_EXPECTED_ITEM_SIZE)
    }

    /// Returns the weight `key` + `len` bytes would occupy.
    #[inline]
    pub fn weigh(&self, key: &str, len: usize) -> u64 {
        chunked_weight((key.len() + len) as u64, self.chunk_size())
    }
}

/// A string-keyed store of byte blobs with bounded capacity.
///
/// Implementations may evict at any time. `insert` either commits the whole blob or
/// nothing, so readers never see a partial write.
pub trait BlobCache: Send + Sync {
    /// Streaming reader over a stored blob.
    type Reader: std::io::BufRead;

    /// Returns a reader over the blob stored under `key`, if present.
    fn get(&self, key: &str) -> Option<Self::Reader>;

    /// Stores `blob` under `key`, replacing any previous blob.
    fn insert(&self, key: &str, blob: Vec<u8>, ttl: Ttl) -> Result<(), Refusal>;

    /// Removes the blob under `key`. Absent keys are ignored.
    fn delete(&self, key: &str);

    /// Releases all stored blobs. Further inserts are refused.
    fn close(&self);
}

#[derive(Clone)]
struct Blob {
    bytes: Arc<[u8]>,
    ttl: Ttl,
}

struct BlobExpiry;

impl Expiry<String, Blob> for BlobExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        blob: &Blob,
        _created_at: Instant,
    ) -> Option<Duration> {
        blob.ttl.duration()
    }

    fn expire_after_update(
        &self,
        _key: &String,
        blob: &Blob,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        blob.ttl.duration()
    }
}

/// In-memory [`BlobCache`] on top of a weighted `moka` cache.
pub struct MokaBlobCache {
    entries: Cache<String, Blob>,
    config: BlobCacheConfig,
    closed: AtomicBool,
}

impl MokaBlobCache {
    /// Creates a cache with the default capacity.
    #[inline]
    pub fn new() -> Self {
        Self::with_config(BlobCacheConfig::default())
    }

    /// Creates a cache with the given sizing.
    pub fn with_config(config: BlobCacheConfig) -> Self {
        let weighing = config;
        let entries = Cache::builder()
            .max_capacity(config.capacity)
            .weigher(move |key: &String, blob: &Blob| -> u32 {
                weighing
                    .weigh(key, blob.bytes.len())
                    .try_into()
                    .unwrap_or(u32::MAX)
            })
            .eviction_policy(EvictionPolicy::lru())
            .expire_after(BlobExpiry)
            .build();

        Self {
            entries,
            config,
            closed: AtomicBool::new(false),
        }
    }

    /// Returns the sizing this cache was built with.
    #[inline]
    pub fn config(&self) -> &BlobCacheConfig {
        &self.config
    }

    /// Returns a copy of the raw bytes stored under `key`.
    pub fn get_bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).map(|blob| blob.bytes.to_vec())
    }

    /// Returns `true` if a blob is stored under `key`.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of stored blobs.
    #[inline]
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Returns `true` if the cache holds no blobs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    /// Returns the total weight of stored blobs.
    #[inline]
    pub fn weighted_size(&self) -> u64 {
        self.entries.weighted_size()
    }

    /// Returns `true` once [`BlobCache::close`] has been called.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Runs any pending maintenance tasks in the underlying cache.
    #[inline]
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }
}

impl BlobCache for MokaBlobCache {
    type Reader = Cursor<Arc<[u8]>>;

    fn get(&self, key: &str) -> Option<Self::Reader> {
        self.entries.get(key).map(|blob| Cursor::new(blob.bytes))
    }

    fn insert(&self, key: &str, blob: Vec<u8>, ttl: Ttl) -> Result<(), Refusal> {
        if self.is_closed() {
            return Err(Refusal::Closed);
        }

        let weight = self.config.weigh(key, blob.len());
        if weight > self.config.capacity {
            return Err(Refusal::Oversize {
                weight,
                capacity: self.config.capacity,
            });
        }

        self.entries.insert(
            key.to_string(),
            Blob {
                bytes: blob.into(),
                ttl,
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) {
        self.entries.invalidate(key);
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
    }
}

impl Default for MokaBlobCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MokaBlobCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaBlobCache")
            .field("entries", &self.entries.entry_count())
            .field("weighted_size", &self.weighted_size())
            .field("config", &self.config)
            .field("closed", &self.is_closed())
            .finish()
    }
}
