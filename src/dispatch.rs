//! Dispatch: turn the store's unprocessed rows into a task manifest.
//!
//! The manifest is published as a named value (`arrival_files`) the
//! downstream extraction task consumes — printed as JSON or written to a
//! file. With `--trigger`, one extraction run is fired per path.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::Config;
use crate::db;
use crate::jobs::JobsClient;
use crate::store;

pub async fn run_dispatch(
    config: &Config,
    output: Option<PathBuf>,
    trigger: bool,
) -> Result<()> {
    let pool = db::connect(config).await?;
    let files = store::select_unprocessed(&pool).await?;

    let manifest = serde_json::json!({ "arrival_files": files });
    let rendered = serde_json::to_string_pretty(&manifest)?;

    match &output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write manifest: {}", path.display()))?;
            println!("manifest written to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    println!("{} arrival files pending", files.len());

    if trigger {
        let client = JobsClient::from_config(config)?;
        for path in &files {
            let run = client.run_now(path).await?;
            println!("triggered {} -> run {}", path, run.run_id);
        }
    }

    pool.close().await;
    Ok(())
}
