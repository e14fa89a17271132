use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub watch: WatchConfig,
    #[serde(default)]
    pub tables: TablesConfig,
    #[serde(default)]
    pub orchestrator: Option<OrchestratorConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WatchConfig {
    /// Directory the reconciler lists on every pass. Single level; arrivals
    /// land here directly.
    pub root: PathBuf,
}

/// Logical names handed to the downstream extraction job. The local tracking
/// table itself has a fixed name; these identify where the job writes.
#[derive(Debug, Deserialize, Clone)]
pub struct TablesConfig {
    #[serde(default = "default_catalog")]
    pub catalog: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_track_table")]
    pub track: String,
    #[serde(default = "default_parsed_table")]
    pub parsed: String,
    #[serde(default = "default_extract_table")]
    pub extract: String,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            database: default_database(),
            track: default_track_table(),
            parsed: default_parsed_table(),
            extract: default_extract_table(),
        }
    }
}

fn default_catalog() -> String {
    "main".to_string()
}
fn default_database() -> String {
    "contracts".to_string()
}
fn default_track_table() -> String {
    "contract_track".to_string()
}
fn default_parsed_table() -> String {
    "contract_parsed".to_string()
}
fn default_extract_table() -> String {
    "contract_extract".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct OrchestratorConfig {
    /// Base URL of the orchestration service, e.g. `https://jobs.example.com`.
    pub host: String,
    /// Identifier of the extraction job to run.
    pub job_id: u64,
    /// Environment variable holding the bearer token (passthrough only; no
    /// auth flow of our own).
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Row-limit bound passed to the extraction job.
    #[serde(default = "default_row_limit")]
    pub row_limit: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_token_env() -> String {
    "ORCHESTRATOR_TOKEN".to_string()
}
fn default_row_limit() -> u32 {
    100
}
fn default_timeout_secs() -> u64 {
    30
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate tables
    for (field, value) in [
        ("tables.catalog", &config.tables.catalog),
        ("tables.database", &config.tables.database),
        ("tables.track", &config.tables.track),
        ("tables.parsed", &config.tables.parsed),
        ("tables.extract", &config.tables.extract),
    ] {
        if value.is_empty() {
            anyhow::bail!("{} must not be empty", field);
        }
    }

    // Validate orchestrator
    if let Some(ref orch) = config.orchestrator {
        if orch.host.is_empty() {
            anyhow::bail!("orchestrator.host must not be empty");
        }
        if orch.job_id == 0 {
            anyhow::bail!("orchestrator.job_id must be set");
        }
        if orch.row_limit == 0 {
            anyhow::bail!("orchestrator.row_limit must be >= 1");
        }
    }

    Ok(config)
}
