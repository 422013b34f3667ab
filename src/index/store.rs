//! Durable tag index backed by redb.
//!
//! Layout:
//! - `entries`: key `(tag, value)`, value = tag index. Serves tag lookups with a
//!   prefix range over the tag.
//! - `value_tags`: key `(value, tag)`, value = tag index. Serves reverse lookups.
//!
//! Both tables are written in the same transaction, so they never disagree.
//! Transactions run on the blocking thread pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use tracing::{debug, info};

use super::PersistentIndex;
use super::error::{IndexError, IndexResult};
use crate::model::Entry;

const ENTRIES: TableDefinition<(&str, &str), u64> = TableDefinition::new("entries");
const VALUE_TAGS: TableDefinition<(&str, &str), u64> = TableDefinition::new("value_tags");

/// File-backed [`PersistentIndex`].
///
/// Closing drops the database handle; transactions already running keep it alive
/// until they finish.
pub struct RedbIndex {
    db: RwLock<Option<Arc<Database>>>,
    path: PathBuf,
}

impl RedbIndex {
    /// Opens the index at `path`, creating the file and its tables if needed.
    pub fn open(path: impl AsRef<Path>) -> IndexResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::create(path)?;

        // Create tables eagerly so read transactions never miss them.
        let write_txn = db.begin_write()?;
        {
            let _t = write_txn.open_table(ENTRIES)?;
            let _t = write_txn.open_table(VALUE_TAGS)?;
        }
        write_txn.commit()?;

        info!(path = %path.display(), "Opened tag index");

        Ok(Self {
            db: RwLock::new(Some(Arc::new(db))),
            path: path.to_path_buf(),
        })
    }

    /// Returns the database file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` once [`PersistentIndex::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.db.read().is_none()
    }

    /// Returns the number of stored associations.
    pub async fn entry_count(&self) -> IndexResult<u64> {
        self.run(|db| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(ENTRIES)?;
            Ok(table.len()?)
        })
        .await
    }

    async fn run<T, F>(&self, op: F) -> IndexResult<T>
    where
        F: FnOnce(&Database) -> IndexResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.read().clone().ok_or(IndexError::Closed)?;
        tokio::task::spawn_blocking(move || op(&db)).await?
    }
}

impl PersistentIndex for RedbIndex {
    const REVERSE_LOOKUP: bool = true;

    async fn get(&self, tags: &[String]) -> IndexResult<Vec<Entry>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let tags = tags.to_vec();
        let entries = self
            .run(move |db| {
                let read_txn = db.begin_read()?;
                let table = read_txn.open_table(ENTRIES)?;

                let mut entries = Vec::new();
                for tag in &tags {
                    for item in table.range((tag.as_str(), "")..)? {
                        let (key, tag_index) = item?;
                        let (stored_tag, value) = key.value();
                        if stored_tag != tag.as_str() {
                            break;
                        }
                        entries.push(Entry::new(value, stored_tag, tag_index.value() as usize));
                    }
                }
                Ok(entries)
            })
            .await?;

        debug!(found = entries.len(), "Read entries from tag index");
        Ok(entries)
    }

    async fn set(&self, entry: &Entry) -> IndexResult<()> {
        let entry = entry.clone();
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            {
                let mut entries = write_txn.open_table(ENTRIES)?;
                entries.insert(
                    (entry.tag.as_str(), entry.value.as_str()),
                    entry.tag_index as u64,
                )?;

                let mut value_tags = write_txn.open_table(VALUE_TAGS)?;
                value_tags.insert(
                    (entry.value.as_str(), entry.tag.as_str()),
                    entry.tag_index as u64,
                )?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, value: &str, tag: &str) -> IndexResult<()> {
        let (value, tag) = (value.to_string(), tag.to_string());
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            {
                let mut entries = write_txn.open_table(ENTRIES)?;
                entries.remove((tag.as_str(), value.as_str()))?;

                let mut value_tags = write_txn.open_table(VALUE_TAGS)?;
                value_tags.remove((value.as_str(), tag.as_str()))?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, tag: &str) -> IndexResult<()> {
        let tag = tag.to_string();
        let removed = self
            .run(move |db| {
                let write_txn = db.begin_write()?;
                let removed;
                {
                    let mut entries = write_txn.open_table(ENTRIES)?;

                    let mut values = Vec::new();
                    for item in entries.range((tag.as_str(), "")..)? {
                        let (key, _) = item?;
                        let (stored_tag, value) = key.value();
                        if stored_tag != tag.as_str() {
                            break;
                        }
                        values.push(value.to_string());
                    }

                    let mut value_tags = write_txn.open_table(VALUE_TAGS)?;
                    for value in &values {
                        entries.remove((tag.as_str(), value.as_str()))?;
                        value_tags.remove((value.as_str(), tag.as_str()))?;
                    }
                    removed = values.len();
                }
                write_txn.commit()?;
                Ok(removed)
            })
            .await?;

        debug!(removed = removed, "Deleted tag from index");
        Ok(())
    }

    async fn get_tags(&self, value: &str) -> IndexResult<Vec<String>> {
        let value = value.to_string();
        self.run(move |db| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(VALUE_TAGS)?;

            let mut tags = Vec::new();
            for item in table.range((value.as_str(), "")..)? {
                let (key, tag_index) = item?;
                let (stored_value, tag) = key.value();
                if stored_value != value.as_str() {
                    break;
                }
                tags.push((tag_index.value(), tag.to_string()));
            }

            tags.sort();
            Ok(tags.into_iter().map(|(_, tag)| tag).collect())
        })
        .await
    }

    fn close(&self) {
        if self.db.write().take().is_some() {
            info!(path = %self.path.display(), "Closed tag index");
        }
    }
}

impl std::fmt::Debug for RedbIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbIndex")
            .field("path", &self.path)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
