//! One reconciliation pass: snapshot the watch directory, fingerprint each
//! arrival, and hand the batch to the tracking store's conditional insert.
//!
//! Each pass is a discrete, stateless invocation (cron-driven); nothing here
//! runs between passes. A pass that finds no new files is a normal outcome.

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

use crate::config::Config;
use crate::db;
use crate::hash;
use crate::listing;
use crate::models::{FileArrival, FileRecord};
use crate::store;

pub async fn run_reconcile(config: &Config, dry_run: bool, limit: Option<usize>) -> Result<()> {
    let mut arrivals = listing::list_directory(&config.watch.root)?;

    if let Some(lim) = limit {
        arrivals.truncate(lim);
    }

    if dry_run {
        println!("reconcile (dry-run)");
        println!("  arrivals found: {}", arrivals.len());
        for arrival in &arrivals {
            println!("  {} ({} bytes)", arrival.file_path, arrival.size);
        }
        return Ok(());
    }

    let pool = db::connect(config).await?;
    let listed = arrivals.len();
    let inserted = reconcile_batch(&pool, arrivals).await?;

    println!("reconcile");
    println!("  listed: {} files", listed);
    println!("  newly tracked: {}", inserted);
    println!("  already tracked: {}", listed as u64 - inserted);
    println!("ok");

    pool.close().await;
    Ok(())
}

/// Hash every arrival and insert the ones the store has not seen, as one
/// idempotent batch. Hash failures abort the pass — a file must never be
/// tracked with a wrong or missing fingerprint.
pub async fn reconcile_batch(pool: &SqlitePool, arrivals: Vec<FileArrival>) -> Result<u64> {
    let mut records = Vec::with_capacity(arrivals.len());
    for arrival in arrivals {
        let file_hash = hash::hash_file(Path::new(&arrival.file_path))?;
        records.push(FileRecord::from_arrival(arrival, file_hash));
    }

    store::insert_if_absent(pool, &records).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate;
    use crate::store;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::fs;
    use std::str::FromStr;
    use tempfile::TempDir;

    async fn test_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        migrate::apply_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn tracks_two_fresh_contracts() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("contract_a.pdf"), b"alpha terms").unwrap();
        fs::write(tmp.path().join("contract_b.pdf"), b"beta terms").unwrap();

        let pool = test_pool().await;
        let arrivals = listing::list_directory(tmp.path()).unwrap();
        let inserted = reconcile_batch(&pool, arrivals).await.unwrap();

        assert_eq!(inserted, 2);
        let manifest = store::select_unprocessed(&pool).await.unwrap();
        assert_eq!(manifest.len(), 2);
    }

    #[tokio::test]
    async fn unchanged_directory_reconciles_to_zero() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("contract_a.pdf"), b"alpha terms").unwrap();

        let pool = test_pool().await;
        let first = reconcile_batch(&pool, listing::list_directory(tmp.path()).unwrap())
            .await
            .unwrap();
        let second = reconcile_batch(&pool, listing::list_directory(tmp.path()).unwrap())
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 0);
    }

    #[tokio::test]
    async fn reupload_under_same_name_is_not_retracked() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("contract_a.pdf");
        fs::write(&path, b"original terms").unwrap();

        let pool = test_pool().await;
        reconcile_batch(&pool, listing::list_directory(tmp.path()).unwrap())
            .await
            .unwrap();

        // Delete and re-upload with different content: the name match
        // suppresses the insert even though the hash differs.
        fs::remove_file(&path).unwrap();
        fs::write(&path, b"revised terms").unwrap();

        let inserted = reconcile_batch(&pool, listing::list_directory(tmp.path()).unwrap())
            .await
            .unwrap();
        assert_eq!(inserted, 0);
    }

    #[tokio::test]
    async fn unreadable_file_fails_the_pass() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("contract_a.pdf"), b"alpha terms").unwrap();

        let pool = test_pool().await;
        let arrivals = listing::list_directory(tmp.path()).unwrap();
        // The file vanishes between listing and hashing.
        fs::remove_file(tmp.path().join("contract_a.pdf")).unwrap();

        let result = reconcile_batch(&pool, arrivals).await;
        assert!(result.is_err());
        assert_eq!(store::counts(&pool).await.unwrap().total, 0);
    }
}
