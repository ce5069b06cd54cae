use std::path::PathBuf;

use brim_types::HashPolicy;

use crate::error::{PipelineError, PipelineResult};

/// Where the prior snapshot comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProxySource {
    /// Load exactly this archive; missing is a configuration error.
    Path(PathBuf),
    /// Auto-pick the most recent proxy archive by name from the output
    /// directory's proxy partition.
    AutoLatest,
    /// Explicit first run: start from an empty snapshot. Never implied.
    Empty,
}

/// Complete configuration of one pipeline run.
///
/// Constructed once by the caller (the CLI reads flags and environment
/// variables) and threaded by reference into every component.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Root of the two-level hashed store. Read-only to the pipeline.
    pub store_root: PathBuf,
    /// Hash policy in force for this store.
    pub policy: HashPolicy,
    /// Prior snapshot source.
    pub proxy: ProxySource,
    /// Root for the three output archive partitions.
    pub out_dir: PathBuf,
    /// Worker threads for the per-object digest step. 1 runs sequentially.
    pub workers: usize,
}

impl RunConfig {
    /// Check the parts of the configuration that must hold before any
    /// scanning begins.
    pub fn validate(&self) -> PipelineResult<()> {
        if !self.store_root.is_dir() {
            return Err(PipelineError::InvalidConfiguration(format!(
                "store root is not a directory: {}",
                self.store_root.display()
            )));
        }
        if self.workers == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
