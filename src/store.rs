//! The tracking store: single source of truth for "have we seen this file"
//! and "has it been processed".
//!
//! All writers and readers go through the narrow operations here —
//! [`insert_if_absent`] for the reconciler and [`select_unprocessed`] for the
//! dispatcher — so the dedup invariant lives in exactly one place. The
//! `processed` flag is flipped to `'S'` only by the external extraction job;
//! no operation in this module mutates it.

use anyhow::Result;
use sqlx::{Row, SqlitePool};
use std::collections::HashSet;

use crate::models::{ChangeEvent, FileRecord, Processed};

// Keeps each statement's bind count under SQLite's variable limit.
const INSERT_CHUNK: usize = 100;

/// Insert the records that are genuinely new under the dedup rule.
///
/// A candidate is a duplicate — and silently skipped — when an existing row
/// matches its `file_name` OR its `file_hash`. The check and the insert are
/// one set-oriented statement, so two overlapping reconciliation passes
/// cannot both insert the same file: SQLite serializes the writers and the
/// second pass's NOT EXISTS sees the first pass's rows.
///
/// The name-only match means a file deleted and re-uploaded under the same
/// name with different content is NOT re-tracked. That is the documented
/// behavior of this table, not a defect.
///
/// Returns the number of rows actually inserted.
pub async fn insert_if_absent(pool: &SqlitePool, records: &[FileRecord]) -> Result<u64> {
    // One pass never submits the same path twice.
    let mut seen = HashSet::new();
    let batch: Vec<&FileRecord> = records
        .iter()
        .filter(|r| seen.insert(r.file_path.as_str()))
        .collect();

    let mut inserted = 0u64;

    for chunk in batch.chunks(INSERT_CHUNK) {
        let values = vec!["(?, ?, ?, ?, ?, ?, ?, ?)"; chunk.len()].join(", ");
        let sql = format!(
            r#"
            WITH arrival (file_name, type, size, processed, file_path, upload_time, processed_time, file_hash) AS (
                VALUES {values}
            )
            INSERT INTO contract_track
                (file_name, type, size, processed, file_path, upload_time, processed_time, file_hash)
            SELECT file_name, type, size, processed, file_path, upload_time, processed_time, file_hash
              FROM arrival
             WHERE NOT EXISTS (
                 SELECT 1 FROM contract_track
                  WHERE contract_track.file_name = arrival.file_name
                     OR contract_track.file_hash = arrival.file_hash
             )
            "#
        );

        let mut query = sqlx::query(&sql);
        for record in chunk {
            query = query
                .bind(&record.file_name)
                .bind(&record.file_type)
                .bind(record.size)
                .bind(record.processed.as_str())
                .bind(&record.file_path)
                .bind(record.upload_time.timestamp())
                .bind(record.processed_time.map(|t| t.timestamp()))
                .bind(&record.file_hash);
        }

        let result = query.execute(pool).await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}

/// All file paths whose record still has `processed = 'N'`, in the store's
/// natural order. An empty list is a normal outcome.
pub async fn select_unprocessed(pool: &SqlitePool) -> Result<Vec<String>> {
    let paths: Vec<String> =
        sqlx::query_scalar("SELECT file_path FROM contract_track WHERE processed = ?")
            .bind(Processed::No.as_str())
            .fetch_all(pool)
            .await?;

    Ok(paths)
}

/// Read the change feed, optionally starting after a sequence number.
pub async fn changes(pool: &SqlitePool, since_seq: Option<i64>) -> Result<Vec<ChangeEvent>> {
    let rows = sqlx::query(
        r#"
        SELECT seq, op, file_path, processed, changed_at
          FROM contract_track_changes
         WHERE seq > ?
         ORDER BY seq
        "#,
    )
    .bind(since_seq.unwrap_or(0))
    .fetch_all(pool)
    .await?;

    let events = rows
        .iter()
        .map(|row| ChangeEvent {
            seq: row.get("seq"),
            op: row.get("op"),
            file_path: row.get("file_path"),
            processed: row.get("processed"),
            changed_at: row.get("changed_at"),
        })
        .collect();

    Ok(events)
}

/// Row counts for the status summary.
pub struct TrackCounts {
    pub total: i64,
    pub unprocessed: i64,
    pub processed: i64,
}

pub async fn counts(pool: &SqlitePool) -> Result<TrackCounts> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contract_track")
        .fetch_one(pool)
        .await?;
    let unprocessed: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM contract_track WHERE processed = ?")
            .bind(Processed::No.as_str())
            .fetch_one(pool)
            .await?;
    let processed: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM contract_track WHERE processed = ?")
            .bind(Processed::Done.as_str())
            .fetch_one(pool)
            .await?;

    Ok(TrackCounts {
        total,
        unprocessed,
        processed,
    })
}
