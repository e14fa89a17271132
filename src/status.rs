//! Tracking overview and change-feed reporting.
//!
//! `status` gives a quick summary of the watch root and the tracking table:
//! how many files are tracked, how many still await extraction, and how big
//! the database is. `changes` prints the append-only change feed for audit.

use anyhow::Result;
use chrono::DateTime;

use crate::config::Config;
use crate::db;
use crate::store;

pub async fn run_status(config: &Config) -> Result<()> {
    let root_status = if config.watch.root.exists() {
        "OK"
    } else {
        "MISSING"
    };

    let pool = db::connect(config).await?;
    let counts = store::counts(&pool).await?;

    let db_size = std::fs::metadata(&config.db.path).map(|m| m.len()).ok();

    println!("contract-watch — Tracking Status");
    println!("================================");
    println!();
    println!("  Watch root:  {} [{}]", config.watch.root.display(), root_status);
    println!("  Database:    {}", config.db.path.display());
    println!("  Size:        {}", format_db_size(db_size));
    println!();
    println!("  Tracked:     {}", counts.total);
    println!("  Pending:     {}", counts.unprocessed);
    println!("  Processed:   {}", counts.processed);

    pool.close().await;
    Ok(())
}

pub async fn run_changes(config: &Config, since_seq: Option<i64>) -> Result<()> {
    let pool = db::connect(config).await?;
    let events = store::changes(&pool, since_seq).await?;

    if events.is_empty() {
        println!("No change events.");
    } else {
        println!("{:<6} {:<8} {:<11} {:<20} PATH", "SEQ", "OP", "PROCESSED", "CHANGED AT");
        for event in &events {
            let when = DateTime::from_timestamp(event.changed_at, 0)
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| event.changed_at.to_string());
            println!(
                "{:<6} {:<8} {:<11} {:<20} {}",
                event.seq, event.op, event.processed, when, event.file_path
            );
        }
    }

    pool.close().await;
    Ok(())
}

/// An unreadable database file must not masquerade as an empty one.
fn format_db_size(size: Option<u64>) -> String {
    match size {
        Some(bytes) => format_bytes(bytes),
        None => "unknown".to_string(),
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
