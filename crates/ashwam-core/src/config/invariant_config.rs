use serde::{Deserialize, Serialize};

use super::defaults;

/// Thresholds for the invariant checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvariantThresholds {
    /// Schema validity below this raises a CRITICAL alert. Default: 0.95.
    pub min_schema_validity: f64,
    /// Evidence validity floor used for significance reporting. Default: 0.90.
    pub min_evidence_validity: f64,
    /// Hallucination rate above this raises a CRITICAL alert. Default: 0.05.
    pub max_hallucination_rate: f64,
    /// Contradiction rate above this raises a CRITICAL alert. Default: 0.01.
    pub max_contradiction_rate: f64,
}

impl Default for InvariantThresholds {
    fn default() -> Self {
        Self {
            min_schema_validity: defaults::DEFAULT_MIN_SCHEMA_VALIDITY,
            min_evidence_validity: defaults::DEFAULT_MIN_EVIDENCE_VALIDITY,
            max_hallucination_rate: defaults::DEFAULT_MAX_HALLUCINATION_RATE,
            max_contradiction_rate: defaults::DEFAULT_MAX_CONTRADICTION_RATE,
        }
    }
}
