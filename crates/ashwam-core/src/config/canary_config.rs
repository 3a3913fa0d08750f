use serde::{Deserialize, Serialize};

use super::defaults;

/// F1 tiers and the evidence-match floor for canary actions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanaryThresholds {
    pub f1_pass: f64,
    pub f1_alert: f64,
    pub f1_human_review: f64,
    /// F1 at or above this is rollback-eligible; below it rollback is immediate.
    pub f1_rollback: f64,
    /// Evidence-match rate below this forces ROLLBACK regardless of F1.
    pub min_evidence_match: f64,
}

impl Default for CanaryThresholds {
    fn default() -> Self {
        Self {
            f1_pass: defaults::DEFAULT_F1_PASS,
            f1_alert: defaults::DEFAULT_F1_ALERT,
            f1_human_review: defaults::DEFAULT_F1_HUMAN_REVIEW,
            f1_rollback: defaults::DEFAULT_F1_ROLLBACK,
            min_evidence_match: defaults::DEFAULT_MIN_EVIDENCE_MATCH,
        }
    }
}
