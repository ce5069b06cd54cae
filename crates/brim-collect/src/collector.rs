//! Single-pass metadata and digest collection.

use std::fs::{File, Metadata};
use std::io::Read;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::digest::DynDigest;

use brim_types::{DigestAlgorithm, Fingerprints, ObjectRecord, UNCLASSIFIED};

use crate::classify::Classify;
use crate::error::{CollectError, CollectResult};

/// Read chunk size for the digest pass.
pub const CHUNK_BYTES: usize = 64 * 1024;

fn accumulator(algorithm: DigestAlgorithm) -> Box<dyn DynDigest> {
    match algorithm {
        DigestAlgorithm::Sha256 => Box::<sha2::Sha256>::default(),
        DigestAlgorithm::Sha1 => Box::<sha1::Sha1>::default(),
    }
}

/// Archive columns are comma-delimited; a label must not carry the outer
/// delimiter or a line break into the record. Classification stays
/// best-effort, so an offending label is repaired, never surfaced as an
/// error.
fn sanitize_label(label: String) -> String {
    if label.contains(',') || label.contains('\n') {
        label.replace(',', ";").replace('\n', " ")
    } else {
        label
    }
}

fn epoch_seconds(time: std::io::Result<SystemTime>, fallback: f64) -> f64 {
    time.ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs_f64())
        .unwrap_or(fallback)
}

/// Compute every requested digest of a file in one chunked read pass.
///
/// All accumulators are fed from the same byte stream; the file is never
/// re-read per algorithm.
pub fn fingerprint_file(
    path: &Path,
    algorithms: &[DigestAlgorithm],
) -> CollectResult<Fingerprints> {
    let mut accumulators: Vec<(DigestAlgorithm, Box<dyn DynDigest>)> = algorithms
        .iter()
        .map(|&algorithm| (algorithm, accumulator(algorithm)))
        .collect();

    let mut file = File::open(path)?;
    let mut chunk = vec![0u8; CHUNK_BYTES];
    loop {
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        for (_, acc) in &mut accumulators {
            acc.update(&chunk[..n]);
        }
    }

    let mut fingerprints = Fingerprints::new();
    for (algorithm, mut acc) in accumulators {
        fingerprints.push(algorithm.label(), hex::encode(acc.finalize_reset()));
    }
    Ok(fingerprints)
}

/// Collect the full record for one store object.
///
/// `digest` is the object's file name; the caller must already have
/// validated it against the active hash policy. Filesystem metadata is
/// captured once, before the digest pass, so size and timestamps are
/// consistent with the hashed content. Classification is best-effort and
/// falls back to the sentinel label.
pub fn collect(
    digest: &str,
    path: &Path,
    algorithms: &[DigestAlgorithm],
    classifier: &dyn Classify,
) -> CollectResult<ObjectRecord> {
    let metadata: Metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(CollectError::NotAFile(path.to_path_buf()));
    }

    let modified_at = epoch_seconds(metadata.modified(), 0.0);
    // Birth time is unsupported on some filesystems; fall back to mtime.
    let created_at = epoch_seconds(metadata.created(), modified_at);

    let fingerprints = fingerprint_file(path, algorithms)?;

    let content_type = classifier
        .classify(path)
        .map(sanitize_label)
        .unwrap_or_else(|| UNCLASSIFIED.to_string());

    Ok(ObjectRecord {
        digest: digest.to_string(),
        size_bytes: metadata.len(),
        created_at,
        modified_at,
        fingerprints,
        content_type,
    })
}
