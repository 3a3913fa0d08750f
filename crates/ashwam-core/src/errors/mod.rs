//! Error handling for the monitor.
//! One error enum per subsystem, `thiserror` only. `anyhow` stays in the binary.
//!
//! Invariant violations are not errors: they are the engine's output and
//! travel as [`crate::models::Violation`] records.

pub mod config_error;
pub mod error_code;
pub mod load_error;
pub mod monitor_error;
pub mod review_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use load_error::{LoadError, RecordError, RecordErrorKind};
pub use monitor_error::{MonitorError, MonitorResult};
pub use review_error::ReviewError;
pub use storage_error::StorageError;
