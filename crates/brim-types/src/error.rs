use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown hash policy: {0}")]
    UnknownPolicy(String),

    #[error("malformed fingerprints: {0}")]
    MalformedFingerprints(String),
}
