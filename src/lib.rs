//! Tag-based best-match lookup.
//!
//! Values are associated with ordered lists of tags. A query is itself an ordered
//! list of tags; the answer is the value sharing the most tags with it, ties going
//! to the value whose stored tag positions follow the query order most closely.
//!
//! # Public API Surface
//!
//! ## Engine
//! - [`TagStash`], [`TagStashHandle`] - Matching engine and its shareable handle
//! - [`TagStashError`], [`TagStashResult`] - Engine errors
//! - [`Match`], [`Score`] - Ranked query results
//!
//! ## Storage
//! - [`TagCache`] over a [`BlobCache`] ([`MokaBlobCache`] by default) - Bounded hot view
//! - [`PersistentIndex`] with [`RedbIndex`] and [`MemoryIndex`] - Authoritative store
//! - [`codec`] - Wire format of cached tag lists
//!
//! ## Configuration
//! - [`Config`], [`ConfigError`] - `TAGSTASH_*` environment settings
//!
//! ## Test/Mock Support
//! [`MockIndex`] is available behind `#[cfg(any(test, feature = "mock"))]`.
//!
//! # Example
//!
//! ```
//! use tagstash::{BlobCacheConfig, MemoryIndex, TagStash};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let stash = TagStash::with_index(MemoryIndex::new(), BlobCacheConfig::default());
//!
//! stash.set("page1", &["foo", "bar", "baz"]).await?;
//! stash.set("page2", &["foo", "qux", "quux"]).await?;
//!
//! assert_eq!(stash.get(&["qux", "foo", "wah"]).await?.as_deref(), Some("page2"));
//! # Ok::<(), tagstash::TagStashError>(())
//! # }).unwrap();
//! ```

pub mod cache;
pub mod codec;
pub mod config;
pub mod constants;
pub mod index;
pub mod model;
pub mod scoring;
pub mod stash;

pub use cache::{
    BlobCache, BlobCacheConfig, MokaBlobCache, Refusal, TagCache, TagCacheError, TagCacheResult,
    Ttl,
};
pub use codec::{CodecError, CodecResult};
pub use config::{Config, ConfigError};
pub use constants::{DEFAULT_CACHE_SIZE, DEFAULT_EXPECTED_ITEM_SIZE, MIN_EXPECTED_ITEM_SIZE};
#[cfg(any(test, feature = "mock"))]
pub use index::MockIndex;
pub use index::{IndexError, IndexResult, MemoryIndex, PersistentIndex, RedbIndex};
pub use model::Entry;
pub use scoring::{Match, MatchScorer, Score};
pub use stash::{TagStash, TagStashError, TagStashHandle, TagStashResult};
