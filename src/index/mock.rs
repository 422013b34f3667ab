//! Mock index with failure injection.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::PersistentIndex;
use super::error::{IndexError, IndexResult};
use super::memory::MemoryIndex;
use crate::model::Entry;

/// Message carried by injected failures.
pub const FORGED_ERROR: &str = "forged";

/// In-memory index that can be told to fail its next call.
///
/// Unlike [`MemoryIndex`] it does not advertise reverse lookup.
#[derive(Default)]
pub struct MockIndex {
    inner: MemoryIndex,
    fail_next: AtomicBool,
    calls: AtomicUsize,
}

impl MockIndex {
    /// Creates an empty mock that succeeds until told otherwise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call (of any kind) fail with a forged backend error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Returns the number of calls made so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns the backing in-memory store.
    pub fn inner(&self) -> &MemoryIndex {
        &self.inner
    }

    fn check(&self) -> IndexResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(IndexError::Backend {
                reason: FORGED_ERROR.to_string(),
            });
        }
        Ok(())
    }
}

impl PersistentIndex for MockIndex {
    async fn get(&self, tags: &[String]) -> IndexResult<Vec<Entry>> {
        self.check()?;
        Ok(self.inner.get_sync(tags))
    }

    async fn set(&self, entry: &Entry) -> IndexResult<()> {
        self.check()?;
        self.inner.set_sync(entry);
        Ok(())
    }

    async fn remove(&self, value: &str, tag: &str) -> IndexResult<()> {
        self.check()?;
        self.inner.remove_sync(value, tag);
        Ok(())
    }

    async fn delete(&self, tag: &str) -> IndexResult<()> {
        self.check()?;
        self.inner.delete_sync(tag);
        Ok(())
    }
}

impl std::fmt::Debug for MockIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockIndex")
            .field("inner", &self.inner)
            .field("calls", &self.calls())
            .finish()
    }
}
