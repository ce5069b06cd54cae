//! Archive naming, timestamping, and auto-selection.
//!
//! Output archives carry a fixed-width, zero-padded UTC timestamp so plain
//! name ordering is also chronological ordering; `latest_proxy` relies on
//! exactly that.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{SnapshotError, SnapshotResult};

/// Fixed-width UTC timestamp embedded in archive names.
pub const TS_FORMAT: &str = "%Y%m%dT%H%M%SZ";

const ENTER_DIR: &str = "enter";
const PROXY_DIR: &str = "proxy";
const TOMBS_DIR: &str = "tombs";

const PROXY_PREFIX: &str = "proxy-";
const PROXY_SUFFIX: &str = ".csv.zst";

/// The three output archive paths of one run, derived from a single
/// run timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveSet {
    /// Objects newly present: `enter/added-<ts>.csv.zst`.
    pub added: PathBuf,
    /// The next full snapshot: `proxy/proxy-<ts>.csv.zst`.
    pub proxy: PathBuf,
    /// Tombstones: `tombs/gone-<ts>.csv.zst`.
    pub gone: PathBuf,
}

impl ArchiveSet {
    /// Derive the archive paths below `out_dir`, creating the three
    /// partition directories. Names are unique per run timestamp and never
    /// overwritten in place.
    pub fn derive(out_dir: &Path, run_ts: DateTime<Utc>) -> SnapshotResult<Self> {
        let ts = run_ts.format(TS_FORMAT);
        let enter = out_dir.join(ENTER_DIR);
        let proxy = out_dir.join(PROXY_DIR);
        let tombs = out_dir.join(TOMBS_DIR);
        for dir in [&enter, &proxy, &tombs] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(Self {
            added: enter.join(format!("added-{ts}.csv.zst")),
            proxy: proxy.join(format!("{PROXY_PREFIX}{ts}{PROXY_SUFFIX}")),
            gone: tombs.join(format!("gone-{ts}.csv.zst")),
        })
    }

    /// The proxy directory below an output root, where [`latest_proxy`]
    /// searches.
    pub fn proxy_dir(out_dir: &Path) -> PathBuf {
        out_dir.join(PROXY_DIR)
    }
}

/// Auto-pick mode: the lexicographically greatest `proxy-*.csv.zst` name
/// in `dir`, which by the timestamp format is also the most recent.
pub fn latest_proxy(dir: &Path) -> SnapshotResult<PathBuf> {
    let mut best: Option<PathBuf> = None;
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SnapshotError::NotFound(dir.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !(name.starts_with(PROXY_PREFIX) && name.ends_with(PROXY_SUFFIX)) {
            continue;
        }
        let path = entry.path();
        if best
            .as_ref()
            .map(|b| path.file_name() > b.file_name())
            .unwrap_or(true)
        {
            best = Some(path);
        }
    }
    best.ok_or_else(|| SnapshotError::NotFound(dir.to_path_buf()))
}
