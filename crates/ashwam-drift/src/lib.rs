//! # ashwam-drift
//!
//! Compares a baseline snapshot set against a current one and classifies
//! every metric as STABLE, DRIFT, or BREAKAGE.
//!
//! - [`distribution`]: per-snapshot shape (domain mix, buckets, volume, uncertainty)
//! - [`statistics`]: Jensen-Shannon divergence, two-sample KS, chi-squared
//! - [`policy`]: thresholds to statuses and pattern alerts
//! - [`engine`]: the [`DriftEngine`] that assembles a `DriftReport`

pub mod distribution;
pub mod engine;
pub mod policy;
pub mod statistics;

pub use engine::DriftEngine;
pub use statistics::{chi_squared_test, jensen_shannon_divergence, ks_two_sample, KsResult};
