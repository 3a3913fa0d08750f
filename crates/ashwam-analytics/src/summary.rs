//! Roll-up of a full monitoring run into one status and one action.

use chrono::{DateTime, Utc};

use ashwam_core::models::{
    generate_run_id, Alert, CanaryAction, CanaryReport, CanarySummary, DriftReport, DriftStatus,
    InvariantReport, InvariantSummary, OverallStatus, SummaryReport,
};

pub const ACTION_ROLLBACK: &str = "roll back to the previous extractor version";
pub const ACTION_BLOCK: &str = "block the batch and investigate critical alerts";
pub const ACTION_MONITOR: &str = "continue monitoring and work through the review queue";
pub const ACTION_NONE: &str = "no action required";

/// CRITICAL: any critical alert, or a canary rollback.
/// DEGRADED: hallucination rate above its threshold, or any drift breakage.
/// HEALTHY otherwise.
pub fn overall_status(
    invariant: &InvariantReport,
    drift: Option<&DriftReport>,
    canary: Option<&CanaryReport>,
) -> OverallStatus {
    let rollback = canary.is_some_and(|c| c.action == CanaryAction::Rollback);
    if rollback || critical_alerts(invariant, drift).next().is_some() {
        return OverallStatus::Critical;
    }
    let breakage = drift.is_some_and(|d| d.worst_status() == DriftStatus::Breakage);
    if breakage || invariant.hallucination_rate > invariant.thresholds.max_hallucination_rate {
        OverallStatus::Degraded
    } else {
        OverallStatus::Healthy
    }
}

/// Critical alerts of the invariant report followed by those of the drift report.
pub fn critical_alerts<'a>(
    invariant: &'a InvariantReport,
    drift: Option<&'a DriftReport>,
) -> impl Iterator<Item = &'a Alert> {
    invariant
        .alerts
        .iter()
        .chain(drift.into_iter().flat_map(|d| d.alerts.iter()))
        .filter(|a| a.is_critical())
}

/// Combine the engine reports of one run.
pub fn build_summary(
    invariant: &InvariantReport,
    drift: Option<&DriftReport>,
    canary: Option<&CanaryReport>,
    now: DateTime<Utc>,
) -> SummaryReport {
    let critical_alerts: Vec<Alert> = critical_alerts(invariant, drift).cloned().collect();
    let rollback = canary.is_some_and(|c| c.action == CanaryAction::Rollback);
    let overall_status = overall_status(invariant, drift, canary);

    let recommended_action = if rollback {
        ACTION_ROLLBACK
    } else {
        match overall_status {
            OverallStatus::Critical => ACTION_BLOCK,
            OverallStatus::Degraded => ACTION_MONITOR,
            OverallStatus::Healthy => ACTION_NONE,
        }
    };

    tracing::info!(
        status = %overall_status,
        critical_alerts = critical_alerts.len(),
        rollback,
        "run summarised"
    );

    SummaryReport {
        run_id: generate_run_id("summary", now),
        timestamp: now,
        overall_status,
        invariant_summary: InvariantSummary {
            hallucination_rate: invariant.hallucination_rate,
            contradiction_rate: invariant.contradiction_rate,
            schema_validity_rate: invariant.schema_validity_rate,
        },
        drift_summary: drift
            .map(|d| d.metrics.iter().map(|m| (m.name, m.status)).collect())
            .unwrap_or_default(),
        canary_summary: canary.map(|c| CanarySummary {
            f1: c.f1,
            precision: c.precision,
            recall: c.recall,
            action: c.action,
        }),
        critical_alerts,
        recommended_action: recommended_action.to_string(),
    }
}
