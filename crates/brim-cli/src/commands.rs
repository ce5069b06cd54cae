use std::path::PathBuf;

use anyhow::{bail, Context};

use brim_collect::FileCommand;
use brim_pipeline::{ProxySource, RunConfig, RunReport};
use brim_types::HashPolicy;

use crate::cli::{Cli, AUTO};

const ENV_FS_ROOT: &str = "BRIM_FS_ROOT";
const ENV_HASH_POLICY: &str = "BRIM_HASH_POLICY";
const ENV_PROXY_DB: &str = "BRIM_PROXY_DB";
const ENV_WORKERS: &str = "BRIM_WORKERS";

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Build the run configuration from flags and environment, flags winning.
fn resolve_config(cli: &Cli) -> anyhow::Result<RunConfig> {
    let store_root = match (&cli.store_root, env_var(ENV_FS_ROOT)) {
        (Some(path), _) => path.clone(),
        (None, Some(value)) => PathBuf::from(value),
        (None, None) => bail!(
            "no store root: pass --store-root or set {ENV_FS_ROOT} \
             to the root of the file system storage"
        ),
    };

    let policy = match cli.hash_policy.clone().or_else(|| env_var(ENV_HASH_POLICY)) {
        Some(name) => name
            .parse::<HashPolicy>()
            .with_context(|| format!("bad {ENV_HASH_POLICY}"))?,
        None => HashPolicy::default(),
    };

    let proxy = if cli.bootstrap {
        ProxySource::Empty
    } else {
        match cli.proxy_db.clone().or_else(|| env_var(ENV_PROXY_DB)) {
            Some(value) if value == AUTO => ProxySource::AutoLatest,
            Some(value) => ProxySource::Path(PathBuf::from(value)),
            None => bail!(
                "no prior snapshot: pass --proxy-db (path or {AUTO}), set \
                 {ENV_PROXY_DB}, or use --bootstrap for a first run"
            ),
        }
    };

    let workers = match cli.workers {
        Some(n) => n,
        None => match env_var(ENV_WORKERS) {
            Some(value) => value
                .parse()
                .with_context(|| format!("bad {ENV_WORKERS}: {value:?}"))?,
            None => 1,
        },
    };

    Ok(RunConfig {
        store_root,
        policy,
        proxy,
        out_dir: cli.out_dir.clone(),
        workers,
    })
}

fn print_report(report: &RunReport) {
    println!(
        "Entered {} entries / {} bytes at {}",
        report.entered,
        report.entered_bytes,
        report.added_path.display()
    );
    println!("Ignored {} entries for hashing", report.ignored);
    println!(
        "Kept {} entries / {} bytes at {}",
        report.next_snapshot_len(),
        report.next_snapshot_bytes(),
        report.proxy_path.display()
    );
    println!(
        "Removed {} entries / {} bytes at {}",
        report.left,
        report.left_bytes,
        report.gone_path.display()
    );
}

pub fn run_scan(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let classifier = FileCommand::new();
    let report = brim_pipeline::run(&config, &classifier)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("brim").chain(args.iter().copied()))
    }

    #[test]
    fn flags_resolve_directly() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap().to_string();
        let cli = parse(&[
            "--store-root",
            &root,
            "--hash-policy",
            "sha1",
            "--proxy-db",
            "AUTO",
            "--workers",
            "8",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.store_root, dir.path());
        assert_eq!(config.policy, HashPolicy::Sha1);
        assert_eq!(config.proxy, ProxySource::AutoLatest);
        assert_eq!(config.workers, 8);
    }

    #[test]
    fn bootstrap_overrides_proxy_source() {
        let cli = parse(&["--store-root", "/tmp", "--bootstrap", "--proxy-db", "x"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.proxy, ProxySource::Empty);
    }

    #[test]
    fn defaults_apply() {
        let cli = parse(&["--store-root", "/tmp", "--bootstrap"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.policy, HashPolicy::Sha256);
        assert_eq!(config.workers, 1);
        assert_eq!(config.out_dir, PathBuf::from("store"));
    }

    #[test]
    fn unknown_policy_rejected() {
        let cli = parse(&["--store-root", "/tmp", "--bootstrap", "--hash-policy", "md5"]);
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn proxy_path_resolves_to_path_source() {
        let cli = parse(&["--store-root", "/tmp", "--proxy-db", "some/proxy.csv.zst"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(
            config.proxy,
            ProxySource::Path(PathBuf::from("some/proxy.csv.zst"))
        );
    }
}
