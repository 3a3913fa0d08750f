//! # ashwam-validation
//!
//! Label-free invariant checks over extractor snapshots.
//!
//! ## Checks
//! 1. **Schema validity**: domain-required buckets, confidence range, non-empty evidence
//! 2. **Hallucination**: every evidence span must ground in its own journal
//! 3. **Contradiction**: one span, one polarity, per journal
//!
//! [`InvariantEngine`] runs all three and builds an
//! [`ashwam_core::models::InvariantReport`].

pub mod checks;
pub mod definitions;
pub mod engine;
pub mod grounding;

pub use engine::InvariantEngine;
pub use grounding::evidence_exists;
