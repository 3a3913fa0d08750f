//! # ashwam-canary
//!
//! Scores a snapshot against a small gold-labelled canary set and decides
//! whether the extractor version passes, needs attention, or rolls back.

pub mod actions;
pub mod engine;
pub mod matcher;
pub mod metrics;

pub use actions::{determine_action, CanarySignals};
pub use engine::CanaryEngine;
