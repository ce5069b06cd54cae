use std::path::PathBuf;

use serde::Serialize;

/// Counts, byte totals, and archive paths of one completed run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// Objects newly present since the prior snapshot.
    pub entered: usize,
    /// Objects present in both the prior snapshot and the store.
    pub kept: usize,
    /// Objects tombstoned: in the prior snapshot, gone from the store.
    pub left: usize,
    /// Walked entries skipped: non-files, invalid digest names, and
    /// objects that vanished mid-scan.
    pub ignored: usize,

    pub entered_bytes: u64,
    pub kept_bytes: u64,
    pub left_bytes: u64,

    pub added_path: PathBuf,
    pub proxy_path: PathBuf,
    pub gone_path: PathBuf,
}

impl RunReport {
    /// Size of the next snapshot: entered plus kept.
    pub fn next_snapshot_len(&self) -> usize {
        self.entered + self.kept
    }

    /// Bytes in the next snapshot.
    pub fn next_snapshot_bytes(&self) -> u64 {
        self.entered_bytes + self.kept_bytes
    }
}
