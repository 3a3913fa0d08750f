//! # ashwam-core
//!
//! Foundation crate for the ashwam extraction monitor.
//! Defines the record types, report types, configuration, errors,
//! constants, and tracing setup. Every other crate in the workspace
//! depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod tracing_setup;

// Re-export the most commonly used types at the crate root.
pub use config::MonitorConfig;
pub use errors::{MonitorError, MonitorResult};
pub use models::{
    Alert, AlertLevel, ArousalBucket, Domain, ExtractedItem, ExtractionSnapshot, GoldItem,
    GoldLabel, IntensityBucket, Journal, JournalIndex, Polarity, Violation,
};
