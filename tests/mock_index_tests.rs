//! Failure injection through the `mock` feature.

use tagstash::index::mock::FORGED_ERROR;
use tagstash::{BlobCacheConfig, IndexError, MockIndex, TagStash, TagStashError};

fn stash() -> TagStash<MockIndex> {
    TagStash::with_index(MockIndex::new(), BlobCacheConfig::default())
}

#[tokio::test]
async fn test_index_failure_is_passed_through() {
    let stash = stash();
    stash.index().fail_next();

    match stash.set("u1", &["foo", "bar"]).await {
        Err(TagStashError::Index(IndexError::Backend { reason })) => {
            assert_eq!(reason, FORGED_ERROR)
        }
        other => panic!("expected forged index error, got {other:?}"),
    }

    // Nothing was written for the first tag, so nothing follows.
    assert!(stash.index().inner().is_empty());
    assert!(stash.cache().get(&["foo", "bar"]).unwrap().is_empty());
}

#[tokio::test]
async fn test_set_is_not_rolled_back_across_tags() {
    let stash = TagStash::with_index(MockIndex::new(), BlobCacheConfig::with_capacity(256));
    let long_tag = "t".repeat(400);

    let err = stash.set("u1", &["foo", long_tag.as_str()]).await.unwrap_err();
    assert!(err.is_failed_to_cache(), "unexpected error: {err}");

    // The first tag stays written in both places.
    assert_eq!(stash.get(&["foo"]).await.unwrap().as_deref(), Some("u1"));
    assert_eq!(stash.index().inner().len(), 2);
}

#[tokio::test]
async fn test_reverse_lookup_unsupported() {
    let stash = stash();
    stash.set("u1", &["foo"]).await.unwrap();

    assert!(matches!(
        stash.get_tags("u1").await,
        Err(TagStashError::NotSupported)
    ));
}
