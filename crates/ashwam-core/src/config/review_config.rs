use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::AlertLevel;

/// Human review budget and prioritisation weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanReviewConfig {
    /// Daily batch cap. Critical items bypass it. Default: 30.
    pub max_daily_reviews: usize,
    /// Pending items older than this are escalated. Default: 24.
    pub escalation_timeout_hours: u64,
    pub critical_weight: f64,
    pub warning_weight: f64,
    pub info_weight: f64,
}

impl HumanReviewConfig {
    /// Priority weight for a severity level.
    pub fn severity_weight(&self, level: AlertLevel) -> f64 {
        match level {
            AlertLevel::Critical => self.critical_weight,
            AlertLevel::Warning => self.warning_weight,
            AlertLevel::Info => self.info_weight,
        }
    }
}

impl Default for HumanReviewConfig {
    fn default() -> Self {
        Self {
            max_daily_reviews: defaults::DEFAULT_MAX_DAILY_REVIEWS,
            escalation_timeout_hours: defaults::DEFAULT_ESCALATION_TIMEOUT_HOURS,
            critical_weight: defaults::DEFAULT_CRITICAL_WEIGHT,
            warning_weight: defaults::DEFAULT_WARNING_WEIGHT,
            info_weight: defaults::DEFAULT_INFO_WEIGHT,
        }
    }
}
