use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Sentinel content-type label used when classification is unavailable.
pub const UNCLASSIFIED: &str = "brim/unclassified";

/// Separator between `algorithm:hexdigest` pairs in a rendered fingerprint
/// set. Distinct from the comma used between record columns, so the inner
/// list can never break the outer column count.
pub const FINGERPRINT_SEPARATOR: char = ';';

/// Order-stable set of `algorithm:hexdigest` pairs for one object.
///
/// Rendered as `sha1:ab..;sha256:cd..` — insertion order is preserved so
/// the rendered form is byte-stable across runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fingerprints(Vec<(String, String)>);

impl Fingerprints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair. Does not deduplicate; callers mint each algorithm once.
    pub fn push(&mut self, algorithm: impl Into<String>, hexdigest: impl Into<String>) {
        self.0.push((algorithm.into(), hexdigest.into()));
    }

    /// Look up the digest recorded for an algorithm label.
    pub fn get(&self, algorithm: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(a, _)| a == algorithm)
            .map(|(_, d)| d.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(a, d)| (a.as_str(), d.as_str()))
    }
}

impl fmt::Display for Fingerprints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (algorithm, digest)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{FINGERPRINT_SEPARATOR}")?;
            }
            write!(f, "{algorithm}:{digest}")?;
        }
        Ok(())
    }
}

impl FromStr for Fingerprints {
    type Err = TypeError;

    /// Parse the canonical rendered form. An empty string is an empty set.
    /// Legacy comma-joined inner lists are not auto-detected; there is one
    /// canonical format only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pairs = Vec::new();
        if s.is_empty() {
            return Ok(Self(pairs));
        }
        for pair in s.split(FINGERPRINT_SEPARATOR) {
            let (algorithm, digest) = pair
                .split_once(':')
                .ok_or_else(|| TypeError::MalformedFingerprints(pair.to_string()))?;
            if algorithm.is_empty() || digest.is_empty() {
                return Err(TypeError::MalformedFingerprints(pair.to_string()));
            }
            pairs.push((algorithm.to_string(), digest.to_string()));
        }
        Ok(Self(pairs))
    }
}

// Serialized as the canonical rendered string, matching the archive format.
impl Serialize for Fingerprints {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Fingerprints {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One inventoried object, keyed by its digest name.
///
/// The digest is the object's file name in the store and is immutable once
/// the record exists. Callers must validate the name against the active
/// [`HashPolicy`](crate::HashPolicy) before constructing a record; this type
/// does not re-check it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Primary key: the object's file name, structurally a content digest.
    pub digest: String,
    /// Object size in bytes.
    pub size_bytes: u64,
    /// Creation time, seconds since the Unix epoch.
    pub created_at: f64,
    /// Last modification time, seconds since the Unix epoch.
    pub modified_at: f64,
    /// Independently computed content digests.
    pub fingerprints: Fingerprints,
    /// Best-effort MIME-like label. Never empty; [`UNCLASSIFIED`] when the
    /// classifier could not resolve one.
    pub content_type: String,
}
