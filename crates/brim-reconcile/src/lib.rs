//! Pure reconciliation engine.
//!
//! Partitions the universe of known digests into `entered` (on disk, absent
//! from the prior snapshot), `kept` (present in both) and `left` (in the
//! prior snapshot, gone from disk — tombstones). No I/O; the engine only
//! iterates the union of the two inputs' keys.
//!
//! Kept records always carry the **prior** record value, never a re-scan:
//! that keeps kept byte totals stable across runs even when filesystem
//! timestamps drift.
//!
//! Tombstone memory is one generation. An object that `left` and later
//! reappears under the same digest is plain `entered` again, identical to a
//! brand-new object.

use brim_types::Snapshot;

/// The three disjoint partitions of one reconciliation, with byte totals.
///
/// Invariants: `entered ∪ kept` is the next snapshot, `kept ∪ left` is the
/// prior snapshot, and the three mappings are pairwise key-disjoint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconciliationResult {
    /// On disk, absent from the prior snapshot.
    pub entered: Snapshot,
    /// Present in both; record values come from the prior snapshot.
    pub kept: Snapshot,
    /// In the prior snapshot, missing on disk.
    pub left: Snapshot,
    pub entered_bytes: u64,
    pub kept_bytes: u64,
    pub left_bytes: u64,
}

impl ReconciliationResult {
    /// The next full snapshot: `entered ∪ kept`.
    pub fn next_snapshot(&self) -> Snapshot {
        let mut next = self.kept.clone();
        next.extend(self.entered.clone().into_iter().map(|(_, r)| r));
        next
    }
}

/// Classify every digest of `prior` and `observed` into exactly one
/// partition.
pub fn reconcile(prior: &Snapshot, observed: Snapshot) -> ReconciliationResult {
    let mut result = ReconciliationResult::default();

    for (digest, record) in prior.iter() {
        if observed.contains(digest) {
            result.kept.insert(record.clone());
        } else {
            result.left.insert(record.clone());
        }
    }
    for (digest, record) in observed.into_iter() {
        if !prior.contains(&digest) {
            result.entered.insert(record);
        }
    }

    result.entered_bytes = result.entered.total_bytes();
    result.kept_bytes = result.kept.total_bytes();
    result.left_bytes = result.left.total_bytes();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use brim_types::ObjectRecord;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn record(digest: &str, size: u64, content_type: &str) -> ObjectRecord {
        ObjectRecord {
            digest: digest.to_string(),
            size_bytes: size,
            created_at: 1.0,
            modified_at: 1.0,
            fingerprints: format!("sha256:{digest}").parse().unwrap(),
            content_type: content_type.to_string(),
        }
    }

    fn snapshot(records: &[(&str, u64)]) -> Snapshot {
        records
            .iter()
            .map(|&(d, s)| record(d, s, "text/plain"))
            .collect()
    }

    #[test]
    fn empty_inputs_empty_result() {
        let result = reconcile(&Snapshot::new(), Snapshot::new());
        assert!(result.entered.is_empty());
        assert!(result.kept.is_empty());
        assert!(result.left.is_empty());
        assert_eq!(result.entered_bytes, 0);
    }

    #[test]
    fn disappear_and_appear() {
        // Prior knows only "aaa..."; disk now holds only "bbb...".
        let aaa = "aa".repeat(32);
        let bbb = "bb".repeat(32);
        let prior = snapshot(&[(&aaa, 10)]);
        let observed = snapshot(&[(&bbb, 10)]);

        let result = reconcile(&prior, observed);
        assert_eq!(result.entered.len(), 1);
        assert!(result.entered.contains(&bbb));
        assert!(result.kept.is_empty());
        assert_eq!(result.left.len(), 1);
        assert!(result.left.contains(&aaa));
        assert_eq!(result.entered_bytes, 10);
        assert_eq!(result.left_bytes, 10);

        let next = result.next_snapshot();
        assert_eq!(next.len(), 1);
        assert!(next.contains(&bbb));
    }

    #[test]
    fn kept_record_comes_from_prior() {
        let aaa = "aa".repeat(32);
        let prior: Snapshot = [record(&aaa, 10, "text/plain")].into_iter().collect();
        // The re-scan saw a different timestamp and content type.
        let mut rescanned = record(&aaa, 10, "application/octet-stream");
        rescanned.modified_at = 99.0;
        let observed: Snapshot = [rescanned].into_iter().collect();

        let result = reconcile(&prior, observed);
        let kept = result.kept.get(&aaa).unwrap();
        assert_eq!(kept.content_type, "text/plain");
        assert_eq!(kept.modified_at, 1.0);
    }

    #[test]
    fn unchanged_store_reconciles_to_kept_only() {
        let prior = snapshot(&[("aa".repeat(32).as_str(), 1), ("bb".repeat(32).as_str(), 2)]);
        let result = reconcile(&prior, prior.clone());
        assert!(result.entered.is_empty());
        assert!(result.left.is_empty());
        assert_eq!(result.kept, prior);
        assert_eq!(result.next_snapshot(), prior);
    }

    #[test]
    fn byte_totals_per_partition() {
        let aaa = "aa".repeat(32);
        let bbb = "bb".repeat(32);
        let ccc = "cc".repeat(32);
        let prior = snapshot(&[(&aaa, 5), (&bbb, 7)]);
        let observed = snapshot(&[(&bbb, 7), (&ccc, 11)]);

        let result = reconcile(&prior, observed);
        assert_eq!(result.entered_bytes, 11);
        assert_eq!(result.kept_bytes, 7);
        assert_eq!(result.left_bytes, 5);
    }

    proptest! {
        #[test]
        fn partition_laws(
            prior_map in proptest::collection::btree_map("[0-9a-f]{8}", 0u64..1000, 0..32),
            observed_map in proptest::collection::btree_map("[0-9a-f]{8}", 0u64..1000, 0..32),
        ) {
            let prior: Snapshot = prior_map
                .iter()
                .map(|(d, &s)| record(d, s, "x/y"))
                .collect();
            let observed: Snapshot = observed_map
                .iter()
                .map(|(d, &s)| record(d, s, "x/y"))
                .collect();

            let result = reconcile(&prior, observed.clone());

            let entered: BTreeSet<&str> = result.entered.keys().collect();
            let kept: BTreeSet<&str> = result.kept.keys().collect();
            let left: BTreeSet<&str> = result.left.keys().collect();
            let prior_keys: BTreeSet<&str> = prior.keys().collect();
            let observed_keys: BTreeSet<&str> = observed.keys().collect();

            // Pairwise disjoint.
            prop_assert!(entered.is_disjoint(&kept));
            prop_assert!(entered.is_disjoint(&left));
            prop_assert!(kept.is_disjoint(&left));

            // entered never intersects the prior; left never intersects disk.
            prop_assert!(entered.is_disjoint(&prior_keys));
            prop_assert!(left.is_disjoint(&observed_keys));

            // The partitions cover exactly the union of both inputs.
            let mut union = entered.clone();
            union.extend(&kept);
            union.extend(&left);
            let mut expected = prior_keys.clone();
            expected.extend(&observed_keys);
            prop_assert_eq!(union, expected);

            // kept ∪ left reconstructs the prior snapshot's keys.
            let mut prior_rebuilt = kept;
            prior_rebuilt.extend(&left);
            prop_assert_eq!(prior_rebuilt, prior_keys);
        }
    }
}
