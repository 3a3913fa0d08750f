//! Aggregate error for callers that drive several subsystems.

use super::error_code::{self, ErrorCode};
use super::{ConfigError, LoadError, ReviewError, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ErrorCode for MonitorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Load(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Review(e) => e.error_code(),
            Self::Serialization(_) => error_code::SERIALIZATION_ERROR,
        }
    }
}

pub type MonitorResult<T> = Result<T, MonitorError>;
