//! Data-load errors.
//!
//! A file that cannot be opened is a [`LoadError`]. A bad line inside a
//! readable file is a [`RecordError`]: collected next to the valid records,
//! never fatal for the batch.

use serde::{Deserialize, Serialize};

use super::error_code::{self, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to load {path}: file not found")]
    FileNotFound { path: String },

    #[error("failed to load {path}: {message}")]
    Io { path: String, message: String },
}

impl ErrorCode for LoadError {
    fn error_code(&self) -> &'static str {
        error_code::LOAD_ERROR
    }
}

/// Why a single record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordErrorKind {
    /// The line is not valid JSON.
    BadJson,
    /// The JSON does not fit the record schema (unknown enum, missing field,
    /// confidence out of range).
    ValidationFailed,
}

/// A rejected record, 1-based line number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("line {line}: {kind:?}: {details}")]
pub struct RecordError {
    pub line: usize,
    pub kind: RecordErrorKind,
    pub details: String,
}
