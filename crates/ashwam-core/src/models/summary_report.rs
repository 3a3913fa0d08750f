use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::alert::Alert;
use super::drift_report::MetricName;
use super::enums::{CanaryAction, DriftStatus, OverallStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvariantSummary {
    pub hallucination_rate: f64,
    pub contradiction_rate: f64,
    pub schema_validity_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanarySummary {
    pub f1: f64,
    pub precision: f64,
    pub recall: f64,
    pub action: CanaryAction,
}

/// Roll-up of one full monitoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub run_id: String,
    pub timestamp: DateTime<Utc>,
    pub overall_status: OverallStatus,
    pub invariant_summary: InvariantSummary,
    pub drift_summary: BTreeMap<MetricName, DriftStatus>,
    #[serde(default)]
    pub canary_summary: Option<CanarySummary>,
    pub critical_alerts: Vec<Alert>,
    pub recommended_action: String,
}
