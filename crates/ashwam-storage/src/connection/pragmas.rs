//! PRAGMA configuration applied to every connection.
//!
//! File-backed: WAL mode, NORMAL sync. Always: foreign_keys ON, 5s busy_timeout.

use rusqlite::Connection;

use ashwam_core::errors::StorageError;

use crate::to_storage_err;

/// Apply pragmas. WAL is only meaningful for file-backed databases.
pub fn apply_pragmas(conn: &Connection, file_backed: bool) -> Result<(), StorageError> {
    if file_backed {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )
        .map_err(|e| to_storage_err(format!("failed to enable WAL: {e}")))?;
    }
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(|e| to_storage_err(format!("failed to apply pragmas: {e}")))
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> Result<bool, StorageError> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
