//! Blob cache primitive and the per-tag cache built on it.

pub mod blob;
pub mod error;
pub mod tag;


pub use blob::{BlobCache, BlobCacheConfig, MokaBlobCache, Refusal, Ttl};
pub use error::{TagCacheError, TagCacheResult};
pub use tag::TagCache;
