use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::record::ObjectRecord;

/// The complete recorded inventory of a store as of a point in time.
///
/// A mapping from digest to [`ObjectRecord`], backed by a `BTreeMap` so
/// iteration order is deterministic and serialized archives are
/// byte-identical for identical content. Loaded snapshots are treated as
/// read-only by the reconciliation engine; a fresh snapshot is built per
/// run, never mutated in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot(BTreeMap<String, ObjectRecord>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, digest: &str) -> Option<&ObjectRecord> {
        self.0.get(digest)
    }

    pub fn contains(&self, digest: &str) -> bool {
        self.0.contains_key(digest)
    }

    /// Insert a record under its own digest key. Returns the previous
    /// record for that digest, if any.
    pub fn insert(&mut self, record: ObjectRecord) -> Option<ObjectRecord> {
        self.0.insert(record.digest.clone(), record)
    }

    /// Iterate records in digest order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObjectRecord)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Sum of `size_bytes` over all records.
    pub fn total_bytes(&self) -> u64 {
        self.0.values().map(|r| r.size_bytes).sum()
    }
}

impl IntoIterator for Snapshot {
    type Item = (String, ObjectRecord);
    type IntoIter = btree_map::IntoIter<String, ObjectRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<ObjectRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = ObjectRecord>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}

impl Extend<ObjectRecord> for Snapshot {
    fn extend<I: IntoIterator<Item = ObjectRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}
