use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::CanaryAction;
use crate::config::CanaryThresholds;

/// Match counts for one canary journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanaryJournalResult {
    pub journal_id: String,
    pub gold_count: usize,
    pub parser_count: usize,
    pub matched: usize,
    pub missed: usize,
    pub extra: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanaryReport {
    pub run_id: String,
    pub timestamp: DateTime<Utc>,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub evidence_match_rate: f64,
    pub matched_count: usize,
    pub missed_count: usize,
    pub extra_count: usize,
    pub action: CanaryAction,
    pub action_reason: String,
    pub per_journal: Vec<CanaryJournalResult>,
    pub thresholds: CanaryThresholds,
}
