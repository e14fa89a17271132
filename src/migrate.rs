use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create the tracking table, its change feed, and the feed triggers.
/// Everything here is idempotent; `init` can run any number of times.
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    // Tracking table: one row per discovered file, keyed by path.
    // `processed` is 'N' until the external extraction job sets 'S'.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contract_track (
            file_name TEXT NOT NULL,
            type TEXT NOT NULL,
            size INTEGER NOT NULL,
            processed TEXT NOT NULL DEFAULT 'N',
            file_path TEXT NOT NULL UNIQUE,
            upload_time INTEGER NOT NULL,
            processed_time INTEGER,
            file_hash TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Append-only change feed for auditability. Never truncated here.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contract_track_changes (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            op TEXT NOT NULL,
            file_path TEXT NOT NULL,
            processed TEXT NOT NULL,
            changed_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS contract_track_feed_insert
        AFTER INSERT ON contract_track
        BEGIN
            INSERT INTO contract_track_changes (op, file_path, processed, changed_at)
            VALUES ('insert', NEW.file_path, NEW.processed, strftime('%s', 'now'));
        END
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS contract_track_feed_update
        AFTER UPDATE ON contract_track
        BEGIN
            INSERT INTO contract_track_changes (op, file_path, processed, changed_at)
            VALUES ('update', NEW.file_path, NEW.processed, strftime('%s', 'now'));
        END
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_contract_track_processed ON contract_track(processed)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
