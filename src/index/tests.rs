use super::*;
use tempfile::TempDir;

fn tags(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

fn sorted(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by(|a, b| (&a.tag, &a.value).cmp(&(&b.tag, &b.value)));
    entries
}

fn open_redb() -> (TempDir, RedbIndex) {
    let dir = TempDir::new().expect("create temp dir");
    let index = RedbIndex::open(dir.path().join("index.redb")).expect("open index");
    (dir, index)
}

async fn check_get_by_tags<I: PersistentIndex>(index: &I) {
    index.set(&Entry::new("u1", "foo", 0)).await.unwrap();
    index.set(&Entry::new("u1", "bar", 1)).await.unwrap();
    index.set(&Entry::new("u2", "foo", 2)).await.unwrap();
    index.set(&Entry::new("u3", "foobar", 0)).await.unwrap();

    let found = index.get(&tags(&["foo"])).await.unwrap();
    assert_eq!(
        sorted(found),
        vec![Entry::new("u1", "foo", 0), Entry::new("u2", "foo", 2)]
    );

    let found = index.get(&tags(&["bar", "missing"])).await.unwrap();
    assert_eq!(found, vec![Entry::new("u1", "bar", 1)]);

    assert!(index.get(&[]).await.unwrap().is_empty());
}

async fn check_upsert<I: PersistentIndex>(index: &I) {
    index.set(&Entry::new("u1", "foo", 0)).await.unwrap();
    index.set(&Entry::new("u1", "foo", 0)).await.unwrap();
    index.set(&Entry::new("u1", "foo", 3)).await.unwrap();

    let found = index.get(&tags(&["foo"])).await.unwrap();
    assert_eq!(found, vec![Entry::new("u1", "foo", 3)]);
}

async fn check_remove_and_delete<I: PersistentIndex>(index: &I) {
    index.set(&Entry::new("u1", "foo", 0)).await.unwrap();
    index.set(&Entry::new("u2", "foo", 0)).await.unwrap();
    index.set(&Entry::new("u1", "bar", 1)).await.unwrap();

    index.remove("u1", "foo").await.unwrap();
    index.remove("u1", "foo").await.expect("removing twice is a no-op");
    index.remove("nobody", "nowhere").await.unwrap();

    assert_eq!(
        index.get(&tags(&["foo"])).await.unwrap(),
        vec![Entry::new("u2", "foo", 0)]
    );

    index.delete("foo").await.unwrap();
    index.delete("foo").await.expect("deleting twice is a no-op");

    assert!(index.get(&tags(&["foo"])).await.unwrap().is_empty());
    assert_eq!(
        index.get(&tags(&["bar"])).await.unwrap(),
        vec![Entry::new("u1", "bar", 1)]
    );
}

async fn check_get_tags<I: PersistentIndex>(index: &I) {
    index.set(&Entry::new("u1", "foo", 0)).await.unwrap();
    index.set(&Entry::new("u1", "bar", 1)).await.unwrap();
    index.set(&Entry::new("u1", "baz", 2)).await.unwrap();
    index.set(&Entry::new("u2", "foo", 0)).await.unwrap();

    assert_eq!(index.get_tags("u1").await.unwrap(), tags(&["foo", "bar", "baz"]));
    assert!(index.get_tags("missing").await.unwrap().is_empty());

    index.delete("bar").await.unwrap();
    assert_eq!(index.get_tags("u1").await.unwrap(), tags(&["foo", "baz"]));
}

#[tokio::test]
async fn test_redb_index_get_by_tags() {
    let (_dir, index) = open_redb();
    check_get_by_tags(&index).await;
}

#[tokio::test]
async fn test_redb_index_upsert() {
    let (_dir, index) = open_redb();
    check_upsert(&index).await;
    assert_eq!(index.entry_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_redb_index_remove_and_delete() {
    let (_dir, index) = open_redb();
    check_remove_and_delete(&index).await;
}

#[tokio::test]
async fn test_redb_index_get_tags() {
    let (_dir, index) = open_redb();
    check_get_tags(&index).await;
}

#[tokio::test]
async fn test_redb_index_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("index.redb");

    {
        let index = RedbIndex::open(&path).expect("open");
        index.set(&Entry::new("u1", "foo", 0)).await.unwrap();
        index.close();
    }

    let index = RedbIndex::open(&path).expect("reopen");
    assert_eq!(
        index.get(&tags(&["foo"])).await.unwrap(),
        vec![Entry::new("u1", "foo", 0)]
    );
    assert_eq!(index.path(), path.as_path());
}

#[tokio::test]
async fn test_redb_index_rejects_calls_after_close() {
    let (_dir, index) = open_redb();
    index.close();
    index.close();

    assert!(index.is_closed());
    assert!(matches!(
        index.get(&tags(&["foo"])).await,
        Err(IndexError::Closed)
    ));
}

#[tokio::test]
async fn test_redb_index_close_releases_database_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.redb");

    let first = RedbIndex::open(&path).expect("open");
    first.set(&Entry::new("u1", "foo", 0)).await.unwrap();
    first.close();

    // The closed index is still alive, but no longer holds the file.
    let second = RedbIndex::open(&path).expect("reopen after close");
    assert_eq!(
        second.get(&tags(&["foo"])).await.unwrap(),
        vec![Entry::new("u1", "foo", 0)]
    );
    assert!(first.is_closed());
    assert!(!second.is_closed());
}

#[test]
fn test_reverse_lookup_capabilities() {
    assert!(<RedbIndex as PersistentIndex>::REVERSE_LOOKUP);
    assert!(<MemoryIndex as PersistentIndex>::REVERSE_LOOKUP);
    assert!(!<MockIndex as PersistentIndex>::REVERSE_LOOKUP);
}

#[tokio::test]
async fn test_memory_index_get_by_tags() {
    check_get_by_tags(&MemoryIndex::new()).await;
}

#[tokio::test]
async fn test_memory_index_upsert() {
    let index = MemoryIndex::new();
    check_upsert(&index).await;
    assert_eq!(index.len(), 1);
}

#[tokio::test]
async fn test_memory_index_remove_and_delete() {
    check_remove_and_delete(&MemoryIndex::new()).await;
}

#[tokio::test]
async fn test_memory_index_get_tags() {
    check_get_tags(&MemoryIndex::new()).await;
}

#[tokio::test]
async fn test_mock_index_fails_once() {
    let index = MockIndex::new();
    index.fail_next();

    match index.set(&Entry::new("u1", "foo", 0)).await {
        Err(IndexError::Backend { reason }) => assert_eq!(reason, mock::FORGED_ERROR),
        other => panic!("expected forged error, got {other:?}"),
    }

    index.set(&Entry::new("u1", "foo", 0)).await.expect("second call succeeds");
    assert_eq!(index.calls(), 2);
    assert_eq!(index.inner().len(), 1);
}

#[tokio::test]
async fn test_default_get_tags_is_unsupported() {
    let index = MockIndex::new();
    assert!(matches!(
        index.get_tags("u1").await,
        Err(IndexError::Unsupported)
    ));
}
