//! Record and report models.
//!
//! Input records (snapshots, journals, gold labels) are borrowed read-only by
//! the engines. Reports are built once per run and never mutated afterwards.

pub mod alert;
pub mod canary_report;
pub mod drift_report;
pub mod enums;
pub mod inputs;
pub mod invariant_report;
pub mod run_id;
pub mod summary_report;
pub mod violation;

pub use alert::Alert;
pub use canary_report::{CanaryJournalResult, CanaryReport};
pub use drift_report::{DriftMetric, DriftReport, MetricName};
pub use enums::{
    AlertLevel, ArousalBucket, CanaryAction, Domain, DriftStatus, IntensityBucket, OverallStatus,
    Polarity,
};
pub use inputs::{
    journal_index, ExtractedItem, ExtractionSnapshot, GoldItem, GoldLabel, Journal, JournalIndex,
};
pub use invariant_report::{InvariantDefinition, InvariantReport};
pub use run_id::generate_run_id;
pub use summary_report::{CanarySummary, InvariantSummary, SummaryReport};
pub use violation::{InvariantName, Violation, ViolationType};
