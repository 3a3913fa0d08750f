//! InvariantEngine: runs the three checks, converts findings into
//! violations, raises alerts, and assembles the report.

use chrono::{DateTime, Utc};

use ashwam_core::config::InvariantThresholds;
use ashwam_core::models::{
    generate_run_id, Alert, AlertLevel, ExtractionSnapshot, InvariantName, InvariantReport,
    JournalIndex, Violation, ViolationType,
};

use crate::checks::contradiction::{find_contradictions, ContradictionResult};
use crate::checks::hallucination::{find_hallucinations, HallucinationResult};
use crate::checks::schema::{compute_schema_validity, SchemaResult};
use crate::definitions::invariant_definitions;

/// Label-free invariant checker. Stateless apart from its thresholds, so one
/// engine can serve any number of runs.
#[derive(Debug, Clone, Default)]
pub struct InvariantEngine {
    thresholds: InvariantThresholds,
}

impl InvariantEngine {
    pub fn new(thresholds: InvariantThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &InvariantThresholds {
        &self.thresholds
    }

    /// Run every invariant over `snapshots`, grounding spans against `journals`.
    pub fn run(&self, snapshots: &[ExtractionSnapshot], journals: &JournalIndex) -> InvariantReport {
        self.run_at(snapshots, journals, Utc::now())
    }

    /// [`run`](Self::run) with an explicit timestamp.
    pub fn run_at(
        &self,
        snapshots: &[ExtractionSnapshot],
        journals: &JournalIndex,
        now: DateTime<Utc>,
    ) -> InvariantReport {
        let run_id = generate_run_id("inv", now);
        let span = ashwam_core::invariant_span!(run_id, snapshots.len());
        let _guard = span.enter();

        let total_items: usize = snapshots.iter().map(|s| s.items.len()).sum();

        let schema = compute_schema_validity(snapshots);
        let hallucination = find_hallucinations(snapshots, journals);
        let contradiction = find_contradictions(snapshots);

        let violations = collect_violations(&schema, &hallucination, &contradiction);
        let alerts = self.raise_alerts(&schema, &hallucination, &contradiction);

        tracing::info!(
            total_items,
            schema_validity = schema.validity_rate,
            hallucination_rate = hallucination.rate,
            contradiction_rate = contradiction.rate,
            violations = violations.len(),
            alerts = alerts.len(),
            "invariant run complete"
        );

        InvariantReport {
            run_id,
            timestamp: now,
            total_items,
            total_journals: snapshots.len(),
            schema_validity_rate: schema.validity_rate,
            evidence_validity_rate: hallucination.evidence_validity_rate(),
            hallucination_rate: hallucination.rate,
            contradiction_rate: contradiction.rate,
            violations,
            alerts,
            thresholds: self.thresholds,
            definitions: invariant_definitions(&self.thresholds),
        }
    }

    fn raise_alerts(
        &self,
        schema: &SchemaResult,
        hallucination: &HallucinationResult,
        contradiction: &ContradictionResult,
    ) -> Vec<Alert> {
        let t = &self.thresholds;
        let mut alerts = Vec::new();

        if schema.validity_rate < t.min_schema_validity {
            alerts.push(Alert::critical(format!(
                "schema validity {} below threshold {}",
                pct1(schema.validity_rate),
                pct0(t.min_schema_validity)
            )));
        }
        if hallucination.rate > t.max_hallucination_rate {
            alerts.push(Alert::critical(format!(
                "hallucination rate {} exceeds threshold {}",
                pct1(hallucination.rate),
                pct0(t.max_hallucination_rate)
            )));
        }
        if contradiction.rate > t.max_contradiction_rate {
            alerts.push(Alert::critical(format!(
                "contradiction rate {} exceeds threshold {}",
                pct1(contradiction.rate),
                pct0(t.max_contradiction_rate)
            )));
        }
        for (span, count) in hallucination.systematic() {
            alerts.push(Alert::warning(format!(
                "systematic hallucination '{span}' appears {count} times"
            )));
        }

        for alert in &alerts {
            match alert.level {
                AlertLevel::Critical => tracing::warn!(alert = %alert, "invariant alert"),
                _ => tracing::debug!(alert = %alert, "invariant alert"),
            }
        }
        alerts
    }
}

fn collect_violations(
    schema: &SchemaResult,
    hallucination: &HallucinationResult,
    contradiction: &ContradictionResult,
) -> Vec<Violation> {
    let mut violations = Vec::with_capacity(
        schema.issues.len() + hallucination.hallucinations.len() + contradiction.flagged_items(),
    );

    violations.extend(schema.issues.iter().map(|issue| Violation {
        journal_id: issue.journal_id.clone(),
        item_index: issue.item_index,
        invariant_name: InvariantName::SchemaValidity,
        violation_type: ViolationType::SchemaError,
        details: issue.details(),
        severity: AlertLevel::Warning,
        evidence_span: issue.evidence_span.clone(),
    }));

    violations.extend(hallucination.hallucinations.iter().map(|h| Violation {
        journal_id: h.journal_id.clone(),
        item_index: h.item_index,
        invariant_name: InvariantName::Hallucination,
        violation_type: ViolationType::EvidenceNotFound,
        details: format!("span '{}' not in source", h.evidence_span),
        severity: AlertLevel::Critical,
        evidence_span: h.evidence_span.clone(),
    }));

    for c in &contradiction.contradictions {
        violations.extend(c.items.iter().map(|item| Violation {
            journal_id: c.journal_id.clone(),
            item_index: item.index,
            invariant_name: InvariantName::Contradiction,
            violation_type: ViolationType::PolarityConflict,
            details: format!(
                "span '{}' has conflicting polarity ({})",
                c.evidence_span, item.polarity
            ),
            severity: AlertLevel::Critical,
            evidence_span: c.evidence_span.clone(),
        }));
    }

    violations
}

fn pct1(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

fn pct0(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}
