use std::path::PathBuf;

use clap::Parser;

/// Sentinel value for `--proxy-db` selecting the most recent proxy archive
/// by name.
pub const AUTO: &str = "AUTO";

#[derive(Parser)]
#[command(
    name = "brim",
    about = "Inventory a content-addressed file store and reconcile it against the last snapshot",
    version,
)]
pub struct Cli {
    /// Root of the two-level hashed file store (env: BRIM_FS_ROOT)
    #[arg(long)]
    pub store_root: Option<PathBuf>,

    /// Hash policy: sha256 or sha1 (env: BRIM_HASH_POLICY)
    #[arg(long)]
    pub hash_policy: Option<String>,

    /// Prior proxy archive path, or AUTO to pick the most recent by name
    /// (env: BRIM_PROXY_DB)
    #[arg(long)]
    pub proxy_db: Option<String>,

    /// Directory for the added/proxy/gone output archives
    #[arg(long, default_value = "store")]
    pub out_dir: PathBuf,

    /// Worker threads for digesting (env: BRIM_WORKERS)
    #[arg(long)]
    pub workers: Option<usize>,

    /// First run: start from an empty snapshot instead of loading one
    #[arg(long)]
    pub bootstrap: bool,

    /// Emit the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    #[arg(short, long)]
    pub verbose: bool,
}
