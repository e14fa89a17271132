//! # contract-watch
//!
//! A batch arrival tracker and extraction dispatcher for contract documents.
//!
//! contract-watch snapshots a managed drop directory, fingerprints each file
//! by content, records genuinely new arrivals in a SQLite tracking table
//! (deduplicating by file name OR content hash), and emits the unprocessed
//! files as a task manifest for a downstream extraction job.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────┐   ┌────────────┐   ┌──────────────┐
//! │  Lister  │──▶│ Hasher │──▶│ Reconciler │──▶│ Tracking     │
//! │ (snapshot)│  │ SHA-256│   │ insert-if- │   │ Store (SQLite│
//! └──────────┘   └────────┘   │  absent    │   │ + change feed)│
//!                             └────────────┘   └──────┬───────┘
//!                                                     │
//!                                      ┌──────────────┤
//!                                      ▼              ▼
//!                               ┌────────────┐  ┌────────────┐
//!                               │  Dispatch  │  │ Extraction │
//!                               │  manifest  │─▶│  Trigger   │
//!                               └────────────┘  └────────────┘
//! ```
//!
//! The extraction job itself is external: it parses the documents and flips
//! each row's `processed` flag to `'S'` when done. Nothing in this crate
//! mutates that flag.
//!
//! ## Quick Start
//!
//! ```bash
//! cwatch init                  # create tracking table + change feed
//! cwatch reconcile             # track new arrivals in the drop directory
//! cwatch dispatch --trigger    # fire extraction for unprocessed files
//! cwatch status                # tracking overview
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`hash`] | Streaming content fingerprint |
//! | [`listing`] | Single-level directory snapshot |
//! | [`reconcile`] | Arrival reconciliation pass |
//! | [`store`] | Tracking store (insert-if-absent / select-unprocessed / change feed) |
//! | [`dispatch`] | Unprocessed-file manifest |
//! | [`jobs`] | Orchestration "run now" client |
//! | [`status`] | Tracking overview and change-feed reporting |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod config;
pub mod db;
pub mod dispatch;
pub mod hash;
pub mod jobs;
pub mod listing;
pub mod migrate;
pub mod models;
pub mod reconcile;
pub mod status;
pub mod store;
