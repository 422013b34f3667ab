use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by persistent index implementations.
pub enum IndexError {
    /// The database could not be opened or created.
    #[error("redb error: {0}")]
    Database(#[from] redb::DatabaseError),

    /// A read or write against stored data failed.
    #[error("redb storage error: {0}")]
    Storage(#[from] redb::StorageError),

    /// A table could not be opened.
    #[error("redb table error: {0}")]
    Table(#[from] redb::TableError),

    /// A transaction could not be started.
    #[error("redb transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),

    /// A write transaction failed to commit.
    #[error("redb commit error: {0}")]
    Commit(#[from] redb::CommitError),

    /// Filesystem error while preparing the index location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking index task panicked or was cancelled.
    #[error("index task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    /// The index does not support reverse lookups.
    #[error("reverse lookup not supported by this index")]
    Unsupported,

    /// The index has been closed.
    #[error("index is closed")]
    Closed,

    /// Any other backend failure.
    #[error("index backend error: {reason}")]
    Backend {
        /// Error message.
        reason: String,
    },
}

impl From<redb::TransactionError> for IndexError {
    fn from(e: redb::TransactionError) -> Self {
        Self::Transaction(Box::new(e))
    }
}

/// Convenience result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;
