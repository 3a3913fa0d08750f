//! Review queue errors.

use super::error_code::{self, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("review item not found: {id}")]
    ItemNotFound { id: String },

    #[error("review item {id} cannot move from {from} to {to}")]
    InvalidTransition { id: String, from: String, to: String },
}

impl ErrorCode for ReviewError {
    fn error_code(&self) -> &'static str {
        error_code::REVIEW_ERROR
    }
}
