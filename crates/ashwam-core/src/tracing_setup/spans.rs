//! Span definitions per engine run. Each carries the run id and input size.

/// Create an invariant-run span.
#[macro_export]
macro_rules! invariant_span {
    ($run_id:expr, $journals:expr) => {
        tracing::info_span!("ashwam.invariants", run_id = %$run_id, journals = $journals)
    };
}

/// Create a drift-run span.
#[macro_export]
macro_rules! drift_span {
    ($run_id:expr, $baseline:expr, $current:expr) => {
        tracing::info_span!(
            "ashwam.drift",
            run_id = %$run_id,
            baseline_journals = $baseline,
            current_journals = $current
        )
    };
}

/// Create a canary-run span.
#[macro_export]
macro_rules! canary_span {
    ($run_id:expr, $gold_journals:expr) => {
        tracing::info_span!("ashwam.canary", run_id = %$run_id, gold_journals = $gold_journals)
    };
}

/// Create a review-queue span.
#[macro_export]
macro_rules! review_span {
    ($operation:expr) => {
        tracing::info_span!("ashwam.review", operation = %$operation)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const INVARIANTS: &str = "ashwam.invariants";
    pub const DRIFT: &str = "ashwam.drift";
    pub const CANARY: &str = "ashwam.canary";
    pub const REVIEW: &str = "ashwam.review";
}
