use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the record codec.
pub enum CodecError {
    /// A record could not be decoded. Decoding stops at the first such record.
    #[error("damaged record #{record}: {reason}")]
    Damaged {
        /// Zero-based position of the offending record in the stream.
        record: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The underlying source or sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    /// Returns `true` for malformed content (as opposed to a failing stream).
    pub fn is_damaged(&self) -> bool {
        matches!(self, CodecError::Damaged { .. })
    }
}

/// Convenience result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
