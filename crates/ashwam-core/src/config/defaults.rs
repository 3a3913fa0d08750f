//! Compiled default thresholds. Conservative, tuned for a health app.

// Invariants
pub const DEFAULT_MIN_SCHEMA_VALIDITY: f64 = 0.95;
pub const DEFAULT_MIN_EVIDENCE_VALIDITY: f64 = 0.90;
pub const DEFAULT_MAX_HALLUCINATION_RATE: f64 = 0.05;
pub const DEFAULT_MAX_CONTRADICTION_RATE: f64 = 0.01;

// Drift
pub const DEFAULT_JS_DRIFT: f64 = 0.10;
pub const DEFAULT_JS_BREAKAGE: f64 = 0.20;
pub const DEFAULT_KS_ALPHA: f64 = 0.05;
pub const DEFAULT_KS_BREAKAGE_ALPHA: f64 = 0.01;
pub const DEFAULT_DOMAIN_SHIFT_PCT: f64 = 15.0;
pub const DEFAULT_AROUSAL_SHIFT_PCT: f64 = 20.0;
pub const DEFAULT_VOLUME_CHANGE_PCT: f64 = 25.0;
pub const DEFAULT_VOLUME_BREAKAGE_PCT: f64 = 50.0;
pub const DEFAULT_UNCERTAINTY_SHIFT_PCT: f64 = 15.0;
pub const DEFAULT_UNCERTAINTY_BREAKAGE_RATE: f64 = 0.6;
pub const DEFAULT_AROUSAL_COLLAPSE_HIGH: f64 = 0.90;
pub const DEFAULT_AROUSAL_COLLAPSE_BASELINE: f64 = 0.70;

// Canary
pub const DEFAULT_F1_PASS: f64 = 0.70;
pub const DEFAULT_F1_ALERT: f64 = 0.60;
pub const DEFAULT_F1_HUMAN_REVIEW: f64 = 0.50;
pub const DEFAULT_F1_ROLLBACK: f64 = 0.40;
pub const DEFAULT_MIN_EVIDENCE_MATCH: f64 = 0.80;

// Human review
pub const DEFAULT_MAX_DAILY_REVIEWS: usize = 30;
pub const DEFAULT_ESCALATION_TIMEOUT_HOURS: u64 = 24;
pub const DEFAULT_CRITICAL_WEIGHT: f64 = 100.0;
pub const DEFAULT_WARNING_WEIGHT: f64 = 50.0;
pub const DEFAULT_INFO_WEIGHT: f64 = 10.0;
