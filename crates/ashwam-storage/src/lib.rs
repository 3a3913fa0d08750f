//! # ashwam-storage
//!
//! Run history in SQLite. Every monitoring run is stored as one `runs` row
//! (headline rates plus the full serialized reports) and one `alerts` row per
//! alert, so trends and alert volume can be queried across runs.

pub mod connection;
pub mod engine;
pub mod migrations;
pub mod queries;

pub use engine::{RunHistory, StoredReports};
pub use queries::runs::{RunRow, TrendMetric, TrendPoint};

use ashwam_core::errors::StorageError;

pub(crate) fn to_storage_err(message: String) -> StorageError {
    StorageError::SqliteError { message }
}
