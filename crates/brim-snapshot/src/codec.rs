//! Loading and saving snapshot archives.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use brim_types::Snapshot;

use crate::error::{SnapshotError, SnapshotResult};
use crate::record::{decode_record, encode_record};

/// Extension marking a zstd-compressed archive.
pub const ZSTD_EXT: &str = "zst";

/// Compression level for written archives.
pub const ZSTD_LEVEL: i32 = 7;

fn is_compressed(path: &Path) -> bool {
    path.extension().map(|e| e == ZSTD_EXT).unwrap_or(false)
}

/// Load a snapshot archive into a keyed mapping.
///
/// Compression is detected by the `.zst` extension and undone
/// transparently. A missing archive is an error: silently starting from an
/// empty snapshot would turn every object into a tombstone-less re-entry.
pub fn load(path: &Path) -> SnapshotResult<Snapshot> {
    if !path.is_file() {
        return Err(SnapshotError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let reader: Box<dyn BufRead> = if is_compressed(path) {
        Box::new(BufReader::new(zstd::stream::read::Decoder::new(file)?))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut snapshot = Snapshot::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        snapshot.insert(decode_record(&line, idx + 1)?);
    }
    tracing::debug!(path = %path.display(), records = snapshot.len(), "loaded snapshot");
    Ok(snapshot)
}

/// Persist a snapshot as a compressed, checksummed archive.
///
/// Appends the `.zst` extension when missing. The archive is written to a
/// sibling temporary path and renamed into place on success, so a crashed
/// run never leaves a partial archive under the final name. The zstd frame
/// carries its content checksum in the trailer, so a future load detects
/// corruption of the stored bytes themselves. Returns the final path.
pub fn save(snapshot: &Snapshot, path: &Path) -> SnapshotResult<PathBuf> {
    let path = if is_compressed(path) {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(ZSTD_EXT);
        PathBuf::from(name)
    };

    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let file = File::create(&tmp)?;
    let mut encoder = zstd::stream::write::Encoder::new(file, ZSTD_LEVEL)?;
    encoder.include_checksum(true)?;
    for (_, record) in snapshot.iter() {
        encoder.write_all(encode_record(record)?.as_bytes())?;
        encoder.write_all(b"\n")?;
    }
    let file = encoder.finish()?;
    file.sync_all()?;
    std::fs::rename(&tmp, &path)?;

    tracing::debug!(path = %path.display(), records = snapshot.len(), "wrote snapshot");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brim_types::{ObjectRecord, UNCLASSIFIED};

    fn record(digest: &str, size: u64) -> ObjectRecord {
        ObjectRecord {
            digest: digest.repeat(64 / digest.len()),
            size_bytes: size,
            created_at: 1700000000.0,
            modified_at: 1700000010.5,
            fingerprints: format!("sha256:{}", digest.repeat(64 / digest.len()))
                .parse()
                .unwrap(),
            content_type: UNCLASSIFIED.to_string(),
        }
    }

    fn sample_snapshot() -> Snapshot {
        [record("aa", 10), record("bb", 20), record("cc", 30)]
            .into_iter()
            .collect()
    }

    #[test]
    fn save_load_roundtrip_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = sample_snapshot();
        let path = save(&snapshot, &dir.path().join("proxy-x.csv")).unwrap();
        assert!(path.to_string_lossy().ends_with(".csv.zst"));
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn load_plain_uncompressed_archive() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = sample_snapshot();
        let mut text = String::new();
        for (_, r) in snapshot.iter() {
            text.push_str(&encode_record(r).unwrap());
            text.push('\n');
        }
        let path = dir.path().join("proxy-plain.csv");
        std::fs::write(&path, text).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn missing_archive_is_not_found() {
        let err = load(Path::new("/nonexistent/proxy.csv.zst")).unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound(_)));
    }

    #[test]
    fn malformed_line_rejected_with_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let good = encode_record(&record("aa", 1)).unwrap();
        std::fs::write(&path, format!("{good}\nnot a record\n")).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, SnapshotError::Malformed { line: 2, .. }));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gaps.csv");
        let good = encode_record(&record("aa", 1)).unwrap();
        std::fs::write(&path, format!("{good}\n\n")).unwrap();
        assert_eq!(load(&path).unwrap().len(), 1);
    }

    #[test]
    fn identical_content_writes_identical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = sample_snapshot();
        let a = save(&snapshot, &dir.path().join("a.csv")).unwrap();
        let b = save(&snapshot, &dir.path().join("b.csv")).unwrap();
        assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
    }

    #[test]
    fn no_tmp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = save(&sample_snapshot(), &dir.path().join("p.csv")).unwrap();
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![path.file_name().unwrap().to_string_lossy().into_owned()]);
    }

    #[test]
    fn empty_snapshot_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = save(&Snapshot::new(), &dir.path().join("empty.csv")).unwrap();
        assert!(load(&path).unwrap().is_empty());
    }
}
