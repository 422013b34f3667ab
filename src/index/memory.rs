//! In-process tag index.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::PersistentIndex;
use super::error::IndexResult;
use crate::model::Entry;

/// [`PersistentIndex`] kept in memory, keyed by `(tag, value)`.
///
/// Nothing survives a restart; useful for embedding without a file and for tests.
#[derive(Default)]
pub struct MemoryIndex {
    entries: RwLock<BTreeMap<(String, String), usize>>,
}

impl MemoryIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored associations.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns every stored association in `(tag, value)` order.
    pub fn entries(&self) -> Vec<Entry> {
        self.entries
            .read()
            .iter()
            .map(|((tag, value), index)| Entry::new(value.as_str(), tag.as_str(), *index))
            .collect()
    }

    pub(crate) fn get_sync(&self, tags: &[String]) -> Vec<Entry> {
        let entries = self.entries.read();
        let mut found = Vec::new();
        for tag in tags {
            let start = (tag.clone(), String::new());
            for ((stored_tag, value), index) in entries.range(start..) {
                if stored_tag != tag {
                    break;
                }
                found.push(Entry::new(value.as_str(), stored_tag.as_str(), *index));
            }
        }
        found
    }

    pub(crate) fn set_sync(&self, entry: &Entry) {
        self.entries
            .write()
            .insert((entry.tag.clone(), entry.value.clone()), entry.tag_index);
    }

    pub(crate) fn remove_sync(&self, value: &str, tag: &str) {
        self.entries
            .write()
            .remove(&(tag.to_string(), value.to_string()));
    }

    pub(crate) fn delete_sync(&self, tag: &str) {
        self.entries.write().retain(|(stored_tag, _), _| stored_tag != tag);
    }

    pub(crate) fn get_tags_sync(&self, value: &str) -> Vec<String> {
        let mut tags: Vec<(usize, String)> = self
            .entries
            .read()
            .iter()
            .filter(|((_, stored_value), _)| stored_value == value)
            .map(|((tag, _), index)| (*index, tag.clone()))
            .collect();
        tags.sort();
        tags.into_iter().map(|(_, tag)| tag).collect()
    }
}

impl PersistentIndex for MemoryIndex {
    const REVERSE_LOOKUP: bool = true;

    async fn get(&self, tags: &[String]) -> IndexResult<Vec<Entry>> {
        Ok(self.get_sync(tags))
    }

    async fn set(&self, entry: &Entry) -> IndexResult<()> {
        self.set_sync(entry);
        Ok(())
    }

    async fn remove(&self, value: &str, tag: &str) -> IndexResult<()> {
        self.remove_sync(value, tag);
        Ok(())
    }

    async fn delete(&self, tag: &str) -> IndexResult<()> {
        self.delete_sync(tag);
        Ok(())
    }

    async fn get_tags(&self, value: &str) -> IndexResult<Vec<String>> {
        Ok(self.get_tags_sync(value))
    }
}

impl std::fmt::Debug for MemoryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryIndex")
            .field("entries", &self.len())
            .finish()
    }
}
