use thiserror::Error;

use brim_snapshot::SnapshotError;
use brim_walk::WalkError;

/// Fatal errors of one pipeline run.
///
/// Per-object failures (a path that stopped being a regular file, a
/// classifier miss) are not in this taxonomy: they demote to the ignored
/// count or the sentinel label and the run continues.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad run configuration, surfaced before any scanning begins.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The prior snapshot could not be located or parsed.
    #[error("snapshot load failed: {0}")]
    SnapshotLoad(#[source] SnapshotError),

    /// An output archive could not be persisted.
    #[error("snapshot write failed: {0}")]
    SnapshotWrite(#[source] SnapshotError),

    /// The store tree could not be walked.
    #[error(transparent)]
    Walk(#[from] WalkError),

    /// The digest worker pool could not be built.
    #[error("worker pool setup failed: {0}")]
    WorkerPool(String),
}

/// Convenience alias for pipeline results.
pub type PipelineResult<T> = Result<T, PipelineError>;
