//! The delimited record line format.
//!
//! One line per object, comma-separated, fixed column order:
//!
//! ```text
//! digest,size_bytes,created_at,modified_at,fingerprints,content_type
//! ```
//!
//! The fingerprint set uses a semicolon inner separator, so the inner list
//! can never change the outer column count. There is exactly one canonical
//! format; legacy layouts are not guessed at.

use brim_types::ObjectRecord;

use crate::error::{SnapshotError, SnapshotResult};

/// Column delimiter between record fields.
pub const FIELD_SEPARATOR: char = ',';

/// Number of columns in a record line.
pub const FIELD_COUNT: usize = 6;

/// Loose structural probe for the key column, deliberately independent of
/// the active hash policy: a snapshot may outlive a policy change.
fn plausible_digest(s: &str) -> bool {
    (16..=128).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn reject_delimiter(
    value: &str,
    digest: &str,
    field: &'static str,
) -> SnapshotResult<()> {
    if value.contains(FIELD_SEPARATOR) || value.contains('\n') {
        return Err(SnapshotError::ReservedDelimiter {
            digest: digest.to_string(),
            field,
        });
    }
    Ok(())
}

/// Render one record as a line, without the trailing newline.
pub fn encode_record(record: &ObjectRecord) -> SnapshotResult<String> {
    let fingerprints = record.fingerprints.to_string();
    reject_delimiter(&record.digest, &record.digest, "digest")?;
    reject_delimiter(&fingerprints, &record.digest, "fingerprints")?;
    reject_delimiter(&record.content_type, &record.digest, "content_type")?;

    Ok(format!(
        "{},{},{},{},{},{}",
        record.digest,
        record.size_bytes,
        record.created_at,
        record.modified_at,
        fingerprints,
        record.content_type,
    ))
}

/// Parse one record line. `line_no` is used for error reporting only.
pub fn decode_record(line: &str, line_no: usize) -> SnapshotResult<ObjectRecord> {
    let malformed = |reason: String| SnapshotError::Malformed {
        line: line_no,
        reason,
    };

    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(malformed(format!(
            "expected {FIELD_COUNT} columns, got {}",
            fields.len()
        )));
    }

    let digest = fields[0];
    if !plausible_digest(digest) {
        return Err(malformed(format!("implausible digest key: {digest:?}")));
    }

    let size_bytes: u64 = fields[1]
        .parse()
        .map_err(|_| malformed(format!("bad size_bytes: {:?}", fields[1])))?;
    let created_at: f64 = fields[2]
        .parse()
        .map_err(|_| malformed(format!("bad created_at: {:?}", fields[2])))?;
    let modified_at: f64 = fields[3]
        .parse()
        .map_err(|_| malformed(format!("bad modified_at: {:?}", fields[3])))?;
    let fingerprints = fields[4]
        .parse()
        .map_err(|e| malformed(format!("bad fingerprints: {e}")))?;

    Ok(ObjectRecord {
        digest: digest.to_string(),
        size_bytes,
        created_at,
        modified_at,
        fingerprints,
        content_type: fields[5].to_string(),
    })
}
