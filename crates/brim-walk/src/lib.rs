//! Deterministic walker over a two-level hashed object store.
//!
//! A store root contains prefix directories, each containing leaf
//! directories, each containing object files named by digest:
//!
//! ```text
//! root/<prefix>/<leaf>/<digest>
//! ```
//!
//! [`walk_store`] streams every entry exactly two directory levels below the
//! root in lexicographic path order, identical on every platform. Two runs
//! over identical content therefore enumerate identically, which is what
//! keeps snapshot archives byte-stable across runs.

pub mod error;

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub use error::{WalkError, WalkResult};

/// One entry found at object depth.
///
/// Non-file entries (stray directories nested too deep) are still yielded
/// so the caller can count them as ignored; the file-type flag comes from
/// the directory entry itself, without an extra stat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreEntry {
    pub path: PathBuf,
    pub is_file: bool,
}

impl StoreEntry {
    /// The entry's file name, if it is valid UTF-8.
    pub fn name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// Stream the entries exactly two directory levels below `root`.
///
/// The sequence is produced lazily; the tree is never materialized as a
/// whole. Entries within each directory are visited in file-name order, so
/// the overall sequence is lexicographic by full path.
pub fn walk_store(root: &Path) -> WalkResult<StoreWalk> {
    if !root.is_dir() {
        return Err(WalkError::RootNotFound(root.to_path_buf()));
    }
    // Depth 3 relative to the root: prefix (1) / leaf (2) / object (3).
    let inner = WalkDir::new(root)
        .min_depth(3)
        .max_depth(3)
        .sort_by_file_name()
        .into_iter();
    Ok(StoreWalk { inner })
}

/// Iterator returned by [`walk_store`].
#[derive(Debug)]
pub struct StoreWalk {
    inner: walkdir::IntoIter,
}

impl Iterator for StoreWalk {
    type Item = WalkResult<StoreEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        Some(entry.map_err(WalkError::from).map(|e| StoreEntry {
            is_file: e.file_type().is_file(),
            path: e.into_path(),
        }))
    }
}
