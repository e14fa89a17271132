//! Core data models used throughout contract-watch.
//!
//! These types represent files as they move through the pipeline: a raw
//! directory listing entry, the tracked record it becomes, and the change
//! feed events the tracking table emits.

use chrono::{DateTime, Utc};

/// A file observed in the watched directory during one listing pass,
/// before its content has been hashed.
#[derive(Debug, Clone)]
pub struct FileArrival {
    pub file_name: String,
    /// Lowercased extension without the leading dot; empty if none.
    pub file_type: String,
    pub size: i64,
    pub file_path: String,
    /// Stamped at listing time, not the file's own modification time.
    pub discovered_at: DateTime<Utc>,
}

/// One row of the tracking table.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub file_name: String,
    pub file_type: String,
    pub size: i64,
    pub file_path: String,
    pub upload_time: DateTime<Utc>,
    /// Null until the external extraction job completes.
    pub processed_time: Option<DateTime<Utc>>,
    pub file_hash: String,
    pub processed: Processed,
}

impl FileRecord {
    /// Build the record for a freshly discovered arrival. New records always
    /// start unprocessed; only the external extraction job flips the flag.
    pub fn from_arrival(arrival: FileArrival, file_hash: String) -> Self {
        Self {
            file_name: arrival.file_name,
            file_type: arrival.file_type,
            size: arrival.size,
            file_path: arrival.file_path,
            upload_time: arrival.discovered_at,
            processed_time: None,
            file_hash,
            processed: Processed::No,
        }
    }
}

/// Processing state of a tracked file. Persisted as `'N'` / `'S'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Processed {
    No,
    Done,
}

impl Processed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Processed::No => "N",
            Processed::Done => "S",
        }
    }
}

/// One entry of the tracking table's append-only change feed.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub seq: i64,
    /// `"insert"` or `"update"`.
    pub op: String,
    pub file_path: String,
    pub processed: String,
    pub changed_at: i64,
}
