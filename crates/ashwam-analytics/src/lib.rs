//! # ashwam-analytics
//!
//! Everything layered on top of the engine reports:
//!
//! - [`confidence`]: Wilson score intervals and significance against a threshold
//! - [`diagnosis`]: recurring failure patterns and their likely causes
//! - [`summary`]: the rolled-up [`SummaryReport`](ashwam_core::models::SummaryReport)
//! - [`narrative`]: markdown renderings for PMs, clinicians, users, and reviewers

pub mod confidence;
pub mod diagnosis;
pub mod narrative;
pub mod summary;

pub use confidence::{confidence_report, wilson_interval, ConfidenceReport, Significance, WilsonInterval};
pub use diagnosis::{diagnose, Diagnosis, DiagnosisSeverity};
pub use narrative::{available_audiences, create_renderer, NarrativeContext, NarrativeRenderer};
pub use summary::build_summary;
