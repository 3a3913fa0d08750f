use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::alert::Alert;
use super::violation::{Violation, ViolationType};
use crate::config::InvariantThresholds;

/// Static description of one invariant, attached to every report for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvariantDefinition {
    pub name: String,
    pub description: String,
    pub why_exists: String,
    pub risk_mitigated: String,
    pub failure_action: String,
    pub threshold: f64,
}

/// Result of one invariant run over one snapshot set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvariantReport {
    pub run_id: String,
    pub timestamp: DateTime<Utc>,
    pub total_items: usize,
    pub total_journals: usize,
    pub schema_validity_rate: f64,
    pub evidence_validity_rate: f64,
    pub hallucination_rate: f64,
    pub contradiction_rate: f64,
    pub violations: Vec<Violation>,
    pub alerts: Vec<Alert>,
    pub thresholds: InvariantThresholds,
    #[serde(default)]
    pub definitions: Vec<InvariantDefinition>,
}

impl InvariantReport {
    pub fn violations_of(&self, kind: ViolationType) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.violation_type == kind)
    }

    pub fn critical_alert_count(&self) -> usize {
        self.alerts.iter().filter(|a| a.is_critical()).count()
    }
}
