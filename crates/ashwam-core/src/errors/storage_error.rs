//! Run-history storage errors.

use super::error_code::{self, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("failed to encode run payload: {message}")]
    Serialization { message: String },
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::Serialization { .. } => error_code::SERIALIZATION_ERROR,
            Self::SqliteError { .. } => error_code::STORAGE_ERROR,
        }
    }
}
