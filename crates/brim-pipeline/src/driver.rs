//! The run driver: load snapshot, walk, collect, reconcile, persist.

use std::path::PathBuf;

use chrono::Utc;
use rayon::prelude::*;

use brim_collect::{collect, Classify};
use brim_reconcile::reconcile;
use brim_snapshot::{latest_proxy, load, save, ArchiveSet};
use brim_types::{DigestAlgorithm, HashPolicy, ObjectRecord, Snapshot};
use brim_walk::walk_store;

use crate::config::{ProxySource, RunConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::report::RunReport;

/// Execute one full inventory run.
///
/// The store tree is strictly read-only here; all mutation is confined to
/// the three freshly named output archives. Objects already present in the
/// prior snapshot are never re-hashed — their kept records come from the
/// prior snapshot, so kept byte totals stay stable across runs.
pub fn run(config: &RunConfig, classifier: &dyn Classify) -> PipelineResult<RunReport> {
    config.validate()?;

    let prior = load_prior(config)?;
    tracing::info!(
        records = prior.len(),
        store = %config.store_root.display(),
        "starting inventory run"
    );

    if config.policy.is_legacy() {
        tracing::warn!(
            legacy = %config.policy,
            current = %HashPolicy::default(),
            "store uses a legacy digest policy; minting current fingerprints alongside"
        );
    }

    // One timestamp per run names all three archives.
    let run_ts = Utc::now();
    let algorithms = config.policy.mint_algorithms();

    let mut ignored = 0usize;
    let mut seen_known: Vec<String> = Vec::new();
    let mut to_collect: Vec<(String, PathBuf)> = Vec::new();

    for entry in walk_store(&config.store_root)? {
        let entry = entry?;
        if !entry.is_file {
            ignored += 1;
            continue;
        }
        let Some(name) = entry.name() else {
            ignored += 1;
            continue;
        };
        if !config.policy.is_valid_name(name) {
            ignored += 1;
            continue;
        }
        if prior.contains(name) {
            seen_known.push(name.to_string());
        } else {
            let name = name.to_string();
            to_collect.push((name, entry.path));
        }
    }

    let collected = collect_records(config, classifier, algorithms, &to_collect)?;

    // Single-threaded build-up of the observed mapping; workers only
    // return records.
    let mut observed = Snapshot::new();
    for name in &seen_known {
        if let Some(record) = prior.get(name) {
            observed.insert(record.clone());
        }
    }
    for record in collected {
        match record {
            Some(record) => {
                observed.insert(record);
            }
            None => ignored += 1,
        }
    }

    let result = reconcile(&prior, observed);
    let next = result.next_snapshot();

    let archives = ArchiveSet::derive(&config.out_dir, run_ts)
        .map_err(PipelineError::SnapshotWrite)?;
    let added_path =
        save(&result.entered, &archives.added).map_err(PipelineError::SnapshotWrite)?;
    let proxy_path = save(&next, &archives.proxy).map_err(PipelineError::SnapshotWrite)?;
    let gone_path =
        save(&result.left, &archives.gone).map_err(PipelineError::SnapshotWrite)?;

    let report = RunReport {
        entered: result.entered.len(),
        kept: result.kept.len(),
        left: result.left.len(),
        ignored,
        entered_bytes: result.entered_bytes,
        kept_bytes: result.kept_bytes,
        left_bytes: result.left_bytes,
        added_path,
        proxy_path,
        gone_path,
    };
    tracing::info!(
        entered = report.entered,
        kept = report.kept,
        left = report.left,
        ignored = report.ignored,
        entered_bytes = report.entered_bytes,
        kept_bytes = report.kept_bytes,
        left_bytes = report.left_bytes,
        "inventory run finished"
    );
    Ok(report)
}

fn load_prior(config: &RunConfig) -> PipelineResult<Snapshot> {
    match &config.proxy {
        ProxySource::Path(path) => load(path).map_err(PipelineError::SnapshotLoad),
        ProxySource::AutoLatest => {
            let dir = ArchiveSet::proxy_dir(&config.out_dir);
            let archive = latest_proxy(&dir).map_err(PipelineError::SnapshotLoad)?;
            tracing::info!(archive = %archive.display(), "auto-selected prior snapshot");
            load(&archive).map_err(PipelineError::SnapshotLoad)
        }
        ProxySource::Empty => Ok(Snapshot::new()),
    }
}

/// Digest new objects, optionally fanning out over a bounded worker pool.
///
/// Each object is independent; failures (an object vanishing mid-scan, a
/// path that stopped being a regular file) skip that object only.
fn collect_records(
    config: &RunConfig,
    classifier: &dyn Classify,
    algorithms: &[DigestAlgorithm],
    to_collect: &[(String, PathBuf)],
) -> PipelineResult<Vec<Option<ObjectRecord>>> {
    let collect_one = |(digest, path): &(String, PathBuf)| -> Option<ObjectRecord> {
        match collect(digest, path, algorithms, classifier) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(object = %digest, error = %e, "skipping object");
                None
            }
        }
    };

    if config.workers > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .build()
            .map_err(|e| PipelineError::WorkerPool(e.to_string()))?;
        Ok(pool.install(|| to_collect.par_iter().map(collect_one).collect()))
    } else {
        Ok(to_collect.iter().map(collect_one).collect())
    }
}
