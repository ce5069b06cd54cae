use std::path::PathBuf;

use thiserror::Error;

/// Errors from collecting metadata and digests for one object.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The path does not reference a regular file.
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),

    /// I/O failure while reading file content or metadata.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for collect results.
pub type CollectResult<T> = Result<T, CollectError>;
