//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.
//!
//! # Blob Weighing
//!
//! The blob cache weighs every item in whole chunks of `expected_item_size` bytes,
//! counting both the key and the encoded record list. The chunk size is a sizing
//! hint only: an item larger than one chunk is admitted as long as its rounded
//! weight fits the total capacity.

/// Default total byte capacity of the blob cache (64 MiB).
pub const DEFAULT_CACHE_SIZE: u64 = 64 * 1024 * 1024;

/// Smallest chunk size the blob cache accepts. Smaller hints are clamped up.
pub const MIN_EXPECTED_ITEM_SIZE: u64 = 64;

/// Default expected item size (one chunk).
pub const DEFAULT_EXPECTED_ITEM_SIZE: u64 = MIN_EXPECTED_ITEM_SIZE;

/// Default location of the durable tag index.
pub const DEFAULT_INDEX_PATH: &str = "./tagstash.redb";

/// Rounds `len` up to a whole number of `chunk` sized chunks.
///
/// A zero `chunk` is treated as [`MIN_EXPECTED_ITEM_SIZE`].
#[inline]
pub fn chunked_weight(len: u64, chunk: u64) -> u64 {
    let chunk = chunk.max(MIN_EXPECTED_ITEM_SIZE);
    len.div_ceil(chunk).max(1).saturating_mul(chunk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunked_weight_rounds_up() {
        assert_eq!(chunked_weight(1, 64), 64);
        assert_eq!(chunked_weight(64, 64), 64);
        assert_eq!(chunked_weight(65, 64), 128);
    }

    #[test]
    fn test_chunked_weight_empty_item_takes_one_chunk() {
        assert_eq!(chunked_weight(0, 128), 128);
    }

    #[test]
    fn test_chunked_weight_clamps_small_chunks() {
        assert_eq!(chunked_weight(10, 8), MIN_EXPECTED_ITEM_SIZE);
        assert_eq!(chunked_weight(10, 0), MIN_EXPECTED_ITEM_SIZE);
    }
}
