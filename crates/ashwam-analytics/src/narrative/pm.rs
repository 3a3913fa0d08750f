//! PM dashboard: overall health, key metrics, alerts, next actions.

use ashwam_core::models::{CanaryAction, DriftStatus, OverallStatus};

use super::{pct, NarrativeContext, NarrativeRenderer};
use crate::summary::overall_status;

const OK: &str = "✓";
const WARN: &str = "⚠️";

pub struct PmDashboard;

impl PmDashboard {
    fn status_label(status: OverallStatus) -> &'static str {
        match status {
            OverallStatus::Critical => "🔴 CRITICAL",
            OverallStatus::Degraded => "🟡 DEGRADED",
            OverallStatus::Healthy => "🟢 HEALTHY",
        }
    }

    fn metric_rows(ctx: &NarrativeContext<'_>) -> Vec<(String, String, &'static str)> {
        let inv = ctx.invariant;
        let t = &inv.thresholds;
        let flag = |bad: bool| if bad { WARN } else { OK };

        let mut rows = vec![
            (
                "hallucination_rate".to_string(),
                pct(inv.hallucination_rate),
                flag(inv.hallucination_rate > t.max_hallucination_rate),
            ),
            (
                "contradiction_rate".to_string(),
                pct(inv.contradiction_rate),
                flag(inv.contradiction_rate > t.max_contradiction_rate),
            ),
            (
                "evidence_validity".to_string(),
                pct(inv.evidence_validity_rate),
                flag(inv.evidence_validity_rate < t.min_evidence_validity),
            ),
            (
                "schema_validity".to_string(),
                pct(inv.schema_validity_rate),
                flag(inv.schema_validity_rate < t.min_schema_validity),
            ),
        ];

        if let Some(drift) = ctx.drift {
            for m in &drift.metrics {
                rows.push((
                    m.name.to_string(),
                    format!("{:.2}", m.current_value),
                    flag(m.status != DriftStatus::Stable),
                ));
            }
        }

        if let Some(canary) = ctx.canary {
            rows.push((
                "canary_f1".to_string(),
                pct(canary.f1),
                flag(canary.action != CanaryAction::Pass),
            ));
        }
        rows
    }

    fn actions(ctx: &NarrativeContext<'_>) -> Vec<&'static str> {
        let inv = ctx.invariant;
        let t = &inv.thresholds;
        let mut actions = Vec::new();
        if inv.hallucination_rate > t.max_hallucination_rate {
            actions.push("review extractor prompt for hallucination patterns");
        }
        if inv.contradiction_rate > t.max_contradiction_rate {
            actions.push("investigate contradiction source");
        }
        if ctx.drift.is_some_and(|d| d.worst_status() == DriftStatus::Breakage) {
            actions.push("consider model rollback");
        }
        match ctx.canary.map(|c| c.action) {
            Some(CanaryAction::HumanReview) => {
                actions.push("queue canary journals for clinical review")
            }
            Some(CanaryAction::Rollback) => actions.push("immediate model rollback required"),
            _ => {}
        }
        if actions.is_empty() {
            actions.push("no immediate actions required");
        }
        actions
    }
}

impl NarrativeRenderer for PmDashboard {
    fn name(&self) -> &'static str {
        "pm"
    }

    fn file_name(&self) -> &'static str {
        "pm_view.md"
    }

    fn render(&self, ctx: &NarrativeContext<'_>) -> String {
        let status = overall_status(ctx.invariant, ctx.drift, ctx.canary);
        let mut output = String::new();

        output.push_str(&format!(
            "## System Health - {}\n\n",
            ctx.generated_at.format("%Y-%m-%d %H:%M")
        ));
        output.push_str(&format!("**Status**: {}\n\n", Self::status_label(status)));

        output.push_str("### Key Metrics\n");
        output.push_str("| Metric | Value | Status |\n");
        output.push_str("|--------|-------|--------|\n");
        for (name, value, flag) in Self::metric_rows(ctx) {
            output.push_str(&format!("| {name} | {value} | {flag} |\n"));
        }
        output.push('\n');

        output.push_str("### Alerts\n");
        let alerts: Vec<_> = ctx
            .invariant
            .alerts
            .iter()
            .chain(ctx.drift.into_iter().flat_map(|d| d.alerts.iter()))
            .collect();
        if alerts.is_empty() {
            output.push_str("- none\n");
        }
        for alert in alerts {
            output.push_str(&format!("- {alert}\n"));
        }
        output.push('\n');

        output.push_str("### Actions\n");
        for (i, action) in Self::actions(ctx).iter().enumerate() {
            output.push_str(&format!("{}. {action}\n", i + 1));
        }
        output
    }
}
