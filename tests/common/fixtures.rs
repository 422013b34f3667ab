use tagstash::{BlobCacheConfig, Config, MemoryIndex, RedbIndex, TagStash};
use tempfile::TempDir;

/// Cache small enough for a few hundred bytes per tag.
pub const SMALL_CACHE_SIZE: u64 = 256;

pub struct RedbStash {
    pub stash: TagStash<RedbIndex>,
    pub config: Config,
    /// Holds the index file; dropped last.
    pub dir: TempDir,
}

pub fn redb_stash() -> RedbStash {
    redb_stash_with_cache(tagstash::DEFAULT_CACHE_SIZE)
}

pub fn redb_stash_with_cache(cache_size: u64) -> RedbStash {
    let dir = TempDir::new().expect("create temp dir");
    let config = Config {
        cache_size,
        index_path: dir.path().join("index.redb"),
        ..Default::default()
    };
    let stash = TagStash::open(&config).expect("open stash");

    RedbStash {
        stash,
        config,
        dir,
    }
}

pub fn memory_stash() -> TagStash<MemoryIndex> {
    TagStash::with_index(MemoryIndex::new(), BlobCacheConfig::default())
}

pub fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
