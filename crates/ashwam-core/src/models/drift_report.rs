use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::alert::Alert;
use super::enums::DriftStatus;
use crate::config::DriftThresholds;

/// The comparable metrics of a drift run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    ExtractionVolume,
    UncertaintyRate,
    DomainMix,
    ArousalDistribution,
    IntensityDistribution,
    ConfidenceDistribution,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExtractionVolume => "extraction_volume",
            Self::UncertaintyRate => "uncertainty_rate",
            Self::DomainMix => "domain_mix",
            Self::ArousalDistribution => "arousal_distribution",
            Self::IntensityDistribution => "intensity_distribution",
            Self::ConfidenceDistribution => "confidence_distribution",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Baseline vs current for one metric.
///
/// For categorical metrics `baseline_value`/`current_value` are the largest
/// category share on each side; `change_pct` is relative to the baseline
/// value except for the uncertainty rate, where it is a percentage-point delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftMetric {
    pub name: MetricName,
    pub baseline_value: f64,
    pub current_value: f64,
    pub change_pct: f64,
    #[serde(default)]
    pub js_divergence: Option<f64>,
    #[serde(default)]
    pub ks_statistic: Option<f64>,
    #[serde(default)]
    pub ks_pvalue: Option<f64>,
    /// Auxiliary chi-squared p-value. Never drives `status`.
    #[serde(default)]
    pub chi_squared_pvalue: Option<f64>,
    pub status: DriftStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub run_id: String,
    pub timestamp: DateTime<Utc>,
    pub baseline_source: String,
    pub current_source: String,
    pub metrics: Vec<DriftMetric>,
    pub alerts: Vec<Alert>,
    pub thresholds: DriftThresholds,
    /// What a healthy value of each metric looks like.
    #[serde(default)]
    pub normal_definitions: BTreeMap<MetricName, String>,
}

impl DriftReport {
    pub fn metric(&self, name: MetricName) -> Option<&DriftMetric> {
        self.metrics.iter().find(|m| m.name == name)
    }

    /// Worst status across all metrics.
    pub fn worst_status(&self) -> DriftStatus {
        self.metrics
            .iter()
            .map(|m| m.status)
            .max()
            .unwrap_or(DriftStatus::Stable)
    }
}
