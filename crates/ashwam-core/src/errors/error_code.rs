//! Stable machine-readable error codes.

/// Every error enum implements this to expose a stable code string
/// for logs, exit reporting, and stored run metadata.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const LOAD_ERROR: &str = "LOAD_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const REVIEW_ERROR: &str = "REVIEW_ERROR";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
