use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or saving snapshot archives.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The requested archive does not exist. A missing prior snapshot is a
    /// configuration error for the caller to surface, never an implicit
    /// empty snapshot.
    #[error("snapshot archive not found: {0}")]
    NotFound(PathBuf),

    /// A record line could not be parsed.
    #[error("malformed snapshot record at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// A record field contains the column delimiter and cannot be written.
    #[error("field {field} of record {digest} contains a reserved delimiter")]
    ReservedDelimiter {
        digest: String,
        field: &'static str,
    },

    /// I/O failure, including compression and decompression errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for snapshot codec results.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
