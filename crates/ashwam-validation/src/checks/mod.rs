//! Per-invariant checks.
//!
//! Each check is a pure pass over borrowed snapshots and returns its rate
//! plus the offending items. The engine turns these into violations.

pub mod contradiction;
pub mod hallucination;
pub mod schema;
