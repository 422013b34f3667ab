//! Matching engine.
//!
//! [`TagStash`] answers "which value's tags best resemble this query?" by merging
//! two sources: the bounded [`TagCache`] and the authoritative [`PersistentIndex`].
//!
//! ```text
//! get_matches(tags)
//!   1. read every query tag from the tag cache
//!   2. query the index for the tags the cache had nothing for
//!   3. write each fetched entry back into the cache (a refusal fails the call)
//!   4. merge cache results then index results, dedupe by value, rank
//! ```
//!
//! Writes go to the index first and then the cache; removals go to the cache first.
//! Neither is transactional across tags.

pub mod error;


pub use error::{TagStashError, TagStashResult};

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::cache::{BlobCache, BlobCacheConfig, MokaBlobCache, TagCache};
use crate::config::Config;
use crate::index::{IndexError, PersistentIndex, RedbIndex};
use crate::model::Entry;
use crate::scoring::{Match, MatchScorer};

/// Tag-based best-match lookup over a cache and a persistent index.
pub struct TagStash<I: PersistentIndex, B: BlobCache = MokaBlobCache> {
    cache: TagCache<B>,
    index: I,
}

impl TagStash<RedbIndex, MokaBlobCache> {
    /// Opens the default stack: a [`MokaBlobCache`] sized from `config` over a
    /// [`RedbIndex`] at `config.index_path`.
    pub fn open(config: &Config) -> TagStashResult<Self> {
        config.validate()?;

        let cache = TagCache::with_config(config.blob_cache_config());
        let index = RedbIndex::open(&config.index_path)?;

        info!(
            cache_size = config.cache_size,
            expected_item_size = config.expected_item_size,
            index_path = %config.index_path.display(),
            "Opened tag stash"
        );

        Ok(Self::new(cache, index))
    }
}

impl<I: PersistentIndex> TagStash<I, MokaBlobCache> {
    /// Puts a new [`MokaBlobCache`] in front of `index`.
    pub fn with_index(index: I, cache_config: BlobCacheConfig) -> Self {
        Self::new(TagCache::with_config(cache_config), index)
    }
}

impl<I: PersistentIndex, B: BlobCache> TagStash<I, B> {
    /// Combines an existing tag cache and index.
    pub fn new(cache: TagCache<B>, index: I) -> Self {
        Self { cache, index }
    }

    /// Returns the tag cache.
    pub fn cache(&self) -> &TagCache<B> {
        &self.cache
    }

    /// Returns the persistent index.
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Wraps the engine in a shareable [`TagStashHandle`].
    pub fn into_handle(self) -> TagStashHandle<I, B> {
        TagStashHandle::new(self)
    }

    /// Returns every value sharing at least one tag with the query, best match first.
    ///
    /// Values are ranked by the number of query tags they share, then by how closely
    /// the stored tag positions follow the query order.
    #[instrument(skip(self, tags), fields(tags = tags.len()))]
    pub async fn get_matches<S>(&self, tags: &[S]) -> TagStashResult<Vec<Match>>
    where
        S: AsRef<str> + Sync,
    {
        let scorer = MatchScorer::new(tags);

        let cached = self.cache.get(scorer.tags())?;
        let missing = scorer.missing_tags(&cached);

        debug!(
            cached = cached.len(),
            missing = missing.len(),
            "Read tag cache"
        );

        let stored = if missing.is_empty() {
            Vec::new()
        } else {
            let stored = self.index.get(&missing).await?;
            for entry in &stored {
                self.cache.set(entry)?;
            }
            debug!(entries = stored.len(), "Warmed tag cache from index");
            stored
        };

        Ok(scorer.rank(cached.iter().chain(stored.iter())))
    }

    /// Returns the best matching value, or `None` when nothing matches.
    pub async fn get<S>(&self, tags: &[S]) -> TagStashResult<Option<String>>
    where
        S: AsRef<str> + Sync,
    {
        let matches = self.get_matches(tags).await?;
        Ok(matches.into_iter().next().map(Match::into_value))
    }

    /// Returns every matching value, best match first.
    pub async fn get_all<S>(&self, tags: &[S]) -> TagStashResult<Vec<String>>
    where
        S: AsRef<str> + Sync,
    {
        let matches = self.get_matches(tags).await?;
        Ok(matches.into_iter().map(Match::into_value).collect())
    }

    /// Associates `value` with `tags`, recording each tag's position.
    ///
    /// Each tag is written to the index and then to the cache. The first failure
    /// aborts the call; tags already written stay written.
    #[instrument(skip(self, value, tags), fields(value_len = value.len(), tags = tags.len()))]
    pub async fn set<S>(&self, value: &str, tags: &[S]) -> TagStashResult<()>
    where
        S: AsRef<str> + Sync,
    {
        for (tag_index, tag) in tags.iter().map(AsRef::as_ref).enumerate() {
            let entry = Entry::new(value, tag, tag_index);
            self.index.set(&entry).await?;
            self.cache.set(&entry)?;
        }

        debug!("Stored value");
        Ok(())
    }

    /// Dissociates `value` from `tag`. Missing associations are a no-op.
    #[instrument(skip(self, value), fields(value_len = value.len(), tag = tag))]
    pub async fn remove(&self, value: &str, tag: &str) -> TagStashResult<()> {
        self.cache.remove(value, tag)?;
        self.index.remove(value, tag).await?;
        Ok(())
    }

    /// Dissociates every value from `tag`.
    #[instrument(skip(self), fields(tag = tag))]
    pub async fn delete(&self, tag: &str) -> TagStashResult<()> {
        self.cache.delete(tag);
        self.index.delete(tag).await?;
        Ok(())
    }

    /// Returns the tags of `value` ordered by their stored position.
    ///
    /// Fails with [`TagStashError::NotSupported`] when the index has no reverse lookup.
    #[instrument(skip(self, value), fields(value_len = value.len()))]
    pub async fn get_tags(&self, value: &str) -> TagStashResult<Vec<String>> {
        if !I::REVERSE_LOOKUP {
            return Err(TagStashError::NotSupported);
        }

        match self.index.get_tags(value).await {
            Ok(tags) => Ok(tags),
            Err(IndexError::Unsupported) => Err(TagStashError::NotSupported),
            Err(e) => Err(e.into()),
        }
    }

    /// Closes the cache, then the index.
    pub fn close(&self) {
        self.cache.close();
        self.index.close();
        info!("Closed tag stash");
    }
}

impl<I, B> std::fmt::Debug for TagStash<I, B>
where
    I: PersistentIndex + std::fmt::Debug,
    B: BlobCache + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagStash")
            .field("cache", &self.cache)
            .field("index", &self.index)
            .finish()
    }
}

/// Cheaply cloneable shared [`TagStash`].
pub struct TagStashHandle<I: PersistentIndex, B: BlobCache = MokaBlobCache> {
    inner: Arc<TagStash<I, B>>,
}

impl<I: PersistentIndex, B: BlobCache> Clone for TagStashHandle<I, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: PersistentIndex, B: BlobCache> TagStashHandle<I, B> {
    /// Moves `stash` behind a shared pointer.
    pub fn new(stash: TagStash<I, B>) -> Self {
        Self {
            inner: Arc::new(stash),
        }
    }

    /// Returns the shared engine.
    pub fn stash(&self) -> &TagStash<I, B> {
        &self.inner
    }

    /// See [`TagStash::get_matches`].
    pub async fn get_matches<S>(&self, tags: &[S]) -> TagStashResult<Vec<Match>>
    where
        S: AsRef<str> + Sync,
    {
        self.inner.get_matches(tags).await
    }

    /// See [`TagStash::get`].
    pub async fn get<S>(&self, tags: &[S]) -> TagStashResult<Option<String>>
    where
        S: AsRef<str> + Sync,
    {
        self.inner.get(tags).await
    }

    /// See [`TagStash::get_all`].
    pub async fn get_all<S>(&self, tags: &[S]) -> TagStashResult<Vec<String>>
    where
        S: AsRef<str> + Sync,
    {
        self.inner.get_all(tags).await
    }

    /// See [`TagStash::set`].
    pub async fn set<S>(&self, value: &str, tags: &[S]) -> TagStashResult<()>
    where
        S: AsRef<str> + Sync,
    {
        self.inner.set(value, tags).await
    }

    /// See [`TagStash::remove`].
    pub async fn remove(&self, value: &str, tag: &str) -> TagStashResult<()> {
        self.inner.remove(value, tag).await
    }

    /// See [`TagStash::delete`].
    pub async fn delete(&self, tag: &str) -> TagStashResult<()> {
        self.inner.delete(tag).await
    }

    /// See [`TagStash::get_tags`].
    pub async fn get_tags(&self, value: &str) -> TagStashResult<Vec<String>> {
        self.inner.get_tags(value).await
    }

    /// Closes the shared engine for every clone.
    pub fn close(&self) {
        self.inner.close();
    }

    /// Returns the number of live clones.
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<I: PersistentIndex, B: BlobCache> std::fmt::Debug for TagStashHandle<I, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagStashHandle")
            .field("strong_count", &self.strong_count())
            .finish()
    }
}
