//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `TAGSTASH_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::cache::BlobCacheConfig;
use crate::constants::{
    DEFAULT_CACHE_SIZE, DEFAULT_EXPECTED_ITEM_SIZE, DEFAULT_INDEX_PATH, MIN_EXPECTED_ITEM_SIZE,
};

/// Settings for the default cache and index stack.
///
/// Use [`Config::from_env`] to read `TAGSTASH_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Total byte capacity of the tag cache. Default: 64 MiB.
    pub cache_size: u64,

    /// Expected size of one cached tag list in bytes. Default: `64`, never less.
    pub expected_item_size: u64,

    /// Path of the redb index file. Default: `./tagstash.redb`.
    pub index_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
            expected_item_size: DEFAULT_EXPECTED_ITEM_SIZE,
            index_path: PathBuf::from(DEFAULT_INDEX_PATH),
        }
    }
}

impl Config {
    const ENV_CACHE_SIZE: &'static str = "TAGSTASH_CACHE_SIZE";
    const ENV_EXPECTED_ITEM_SIZE: &'static str = "TAGSTASH_EXPECTED_ITEM_SIZE";
    const ENV_INDEX_PATH: &'static str = "TAGSTASH_INDEX_PATH";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cache_size = Self::parse_u64_from_env(Self::ENV_CACHE_SIZE, defaults.cache_size)?;
        let expected_item_size =
            Self::parse_u64_from_env(Self::ENV_EXPECTED_ITEM_SIZE, defaults.expected_item_size)?
                .max(MIN_EXPECTED_ITEM_SIZE);
        let index_path = Self::parse_path_from_env(Self::ENV_INDEX_PATH, defaults.index_path);

        Ok(Self {
            cache_size,
            expected_item_size,
            index_path,
        })
    }

    /// Checks basic invariants (does not create anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_size == 0 {
            return Err(ConfigError::ZeroCacheSize);
        }

        if self.index_path.is_dir() {
            return Err(ConfigError::NotAFile {
                path: self.index_path.clone(),
            });
        }

        Ok(())
    }

    /// Returns the blob cache sizing these settings describe.
    pub fn blob_cache_config(&self) -> BlobCacheConfig {
        BlobCacheConfig::with_capacity(self.cache_size).expected_item_size(self.expected_item_size)
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }
}
