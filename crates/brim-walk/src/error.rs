use std::path::PathBuf;

use thiserror::Error;

/// Errors from walking a store tree.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The configured store root does not exist or is not a directory.
    #[error("store root not found: {0}")]
    RootNotFound(PathBuf),

    /// A directory below the root could not be read.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Convenience alias for walk results.
pub type WalkResult<T> = Result<T, WalkError>;
