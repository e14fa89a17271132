//! # contract-watch CLI (`cwatch`)
//!
//! The `cwatch` binary drives the contract arrival pipeline. Each command is
//! a discrete batch invocation — the intended deployment is a cron or
//! orchestrator schedule, not a resident process.
//!
//! ## Usage
//!
//! ```bash
//! cwatch --config ./config/cwatch.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cwatch init` | Create the tracking table and change feed |
//! | `cwatch reconcile` | Snapshot the watch directory and track new arrivals |
//! | `cwatch dispatch` | Emit the unprocessed-file manifest (optionally trigger runs) |
//! | `cwatch trigger <path>` | Fire the extraction job for one file |
//! | `cwatch status` | Show watch-root health and tracking counts |
//! | `cwatch changes` | Print the tracking table's change feed |
//!
//! ## Examples
//!
//! ```bash
//! # Initialize the tracking database
//! cwatch init --config ./config/cwatch.toml
//!
//! # One discovery pass over the drop directory
//! cwatch reconcile --config ./config/cwatch.toml
//!
//! # See what would be tracked without writing
//! cwatch reconcile --dry-run
//!
//! # Publish the arrival manifest and fire one run per file
//! cwatch dispatch --trigger
//!
//! # Audit what changed, starting after sequence 42
//! cwatch changes --since 42
//! ```

mod config;
mod db;
mod dispatch;
mod hash;
mod jobs;
mod listing;
mod migrate;
mod models;
mod reconcile;
mod status;
mod store;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// contract-watch — tracks contract document arrivals, deduplicates them,
/// and dispatches unprocessed files to a downstream extraction job.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file holding the database path, the watch root, the downstream table
/// names, and the orchestrator connection.
#[derive(Parser)]
#[command(
    name = "cwatch",
    about = "contract-watch — arrival tracking and extraction dispatch for contract documents",
    version,
    long_about = "contract-watch lists a managed drop directory, fingerprints each file by \
    content, records genuinely new arrivals in a tracking table (dedup by name OR hash), and \
    emits the unprocessed files as a task manifest for a downstream extraction job."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/cwatch.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the tracking database schema.
    ///
    /// Creates the tracking table, the change-feed table, and the feed
    /// triggers. Idempotent — running it multiple times is safe.
    Init,

    /// Run one reconciliation pass over the watch directory.
    ///
    /// Lists the directory (single level), hashes every file, and inserts
    /// the arrivals the store has not seen under the name-OR-hash dedup
    /// rule. Finding nothing new is a normal outcome.
    Reconcile {
        /// List arrivals without hashing or writing to the database.
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of arrivals to process this pass.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Emit the manifest of unprocessed files.
    ///
    /// Selects every tracked file still marked `N` and publishes the list
    /// as the named value `arrival_files`. An empty manifest is valid.
    Dispatch {
        /// Write the manifest JSON to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Fire one extraction run per manifest entry.
        #[arg(long)]
        trigger: bool,
    },

    /// Trigger the extraction job for a single file path.
    ///
    /// Calls the orchestrator's "run now" with the configured catalog,
    /// schema, table names, and row limit. Prints the run id on success.
    Trigger {
        /// Fully qualified source document path.
        path: String,
    },

    /// Show watch-root health and tracking counts.
    Status,

    /// Print the tracking table's change feed.
    Changes {
        /// Only show events after this sequence number.
        #[arg(long)]
        since: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Tracking database initialized successfully.");
        }
        Commands::Reconcile { dry_run, limit } => {
            reconcile::run_reconcile(&cfg, dry_run, limit).await?;
        }
        Commands::Dispatch { output, trigger } => {
            dispatch::run_dispatch(&cfg, output, trigger).await?;
        }
        Commands::Trigger { path } => {
            let client = jobs::JobsClient::from_config(&cfg)?;
            let run = client.run_now(&path).await?;
            println!("triggered {} -> run {}", path, run.run_id);
        }
        Commands::Status => {
            status::run_status(&cfg).await?;
        }
        Commands::Changes { since } => {
            status::run_changes(&cfg, since).await?;
        }
    }

    Ok(())
}
