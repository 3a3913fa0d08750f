//! Auto-diagnosis: recurring violation patterns mapped to likely causes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use ashwam_core::models::{InvariantReport, ViolationType};

/// A hallucinated span seen at least this often is systematic.
pub const SYSTEMATIC_MIN_OCCURRENCES: usize = 3;
/// Only the most frequent systematic spans are reported.
pub const SYSTEMATIC_TOP_N: usize = 3;
/// Polarity conflicts at or above this count indicate negation handling trouble.
pub const POLARITY_CONFUSION_MIN: usize = 2;
/// A journal with at least this many violations is "hot".
pub const HOT_JOURNAL_MIN_VIOLATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosisSeverity {
    None,
    Medium,
    High,
}

impl fmt::Display for DiagnosisSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DetectedPattern {
    SystematicHallucination {
        pattern: String,
        occurrences: usize,
        description: String,
    },
    PolarityConfusion {
        occurrences: usize,
        description: String,
    },
    HotJournal {
        journal_id: String,
        violations: usize,
        description: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub patterns_detected: Vec<DetectedPattern>,
    pub likely_causes: Vec<String>,
    pub recommended_actions: Vec<String>,
    pub severity: DiagnosisSeverity,
}

impl Diagnosis {
    fn healthy() -> Self {
        Self {
            patterns_detected: Vec::new(),
            likely_causes: Vec::new(),
            recommended_actions: Vec::new(),
            severity: DiagnosisSeverity::None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns_detected.is_empty()
    }

    fn raise(&mut self, severity: DiagnosisSeverity) {
        self.severity = self.severity.max(severity);
    }
}

/// Inspect the violations of one run for recurring patterns.
pub fn diagnose(report: &InvariantReport) -> Diagnosis {
    let mut diagnosis = Diagnosis::healthy();
    if report.violations.is_empty() {
        return diagnosis;
    }

    for (span, count) in top_spans(report) {
        diagnosis.patterns_detected.push(DetectedPattern::SystematicHallucination {
            pattern: span.to_string(),
            occurrences: count,
            description: format!("'{span}' appears {count} times but never in source text"),
        });
        diagnosis.likely_causes.push(format!(
            "Extractor prompt may contain '{span}' as an example, causing over-extraction"
        ));
        diagnosis
            .recommended_actions
            .push(format!("Review extractor prompt for leading examples containing '{span}'"));
        diagnosis.raise(DiagnosisSeverity::High);
    }

    let conflicts = report.violations_of(ViolationType::PolarityConflict).count();
    if conflicts >= POLARITY_CONFUSION_MIN {
        diagnosis.patterns_detected.push(DetectedPattern::PolarityConfusion {
            occurrences: conflicts,
            description: "Extractor is emitting the same evidence with opposite polarity".to_string(),
        });
        diagnosis
            .likely_causes
            .push("Extractor may not handle negation words (no, not, without) correctly".to_string());
        diagnosis
            .recommended_actions
            .push("Add negation examples to the extractor prompt".to_string());
        diagnosis.raise(DiagnosisSeverity::Medium);
    }

    let hot = hot_journals(report);
    if !hot.is_empty() {
        for (journal_id, count) in hot {
            diagnosis.patterns_detected.push(DetectedPattern::HotJournal {
                journal_id: journal_id.to_string(),
                violations: count,
                description: format!(
                    "Journal {journal_id} has {count} violations and may be adversarial or an edge case"
                ),
            });
        }
        diagnosis
            .recommended_actions
            .push("Review hot journals for unusual patterns or adversarial content".to_string());
    }

    tracing::debug!(
        run_id = %report.run_id,
        patterns = diagnosis.patterns_detected.len(),
        severity = %diagnosis.severity,
        "diagnosis complete"
    );
    diagnosis
}

fn top_spans(report: &InvariantReport) -> Vec<(&str, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in report.violations_of(ViolationType::EvidenceNotFound) {
        *counts.entry(v.evidence_span.as_str()).or_default() += 1;
    }
    let mut spans: Vec<(&str, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= SYSTEMATIC_MIN_OCCURRENCES)
        .collect();
    // BTreeMap order breaks count ties by span; the sort is stable.
    spans.sort_by(|a, b| b.1.cmp(&a.1));
    spans.truncate(SYSTEMATIC_TOP_N);
    spans
}

fn hot_journals(report: &InvariantReport) -> Vec<(&str, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in &report.violations {
        *counts.entry(v.journal_id.as_str()).or_default() += 1;
    }
    let mut hot: Vec<(&str, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= HOT_JOURNAL_MIN_VIOLATIONS)
        .collect();
    hot.sort_by(|a, b| b.1.cmp(&a.1));
    hot
}

#[cfg(test)]
mod tests {
    use super::*;
    use ashwam_core::config::InvariantThresholds;
    use ashwam_core::models::{AlertLevel, InvariantName, Violation};
    use chrono::Utc;

    fn violation(journal: &str, kind: ViolationType, span: &str) -> Violation {
        let invariant_name = match kind {
            ViolationType::SchemaError => InvariantName::SchemaValidity,
            ViolationType::EvidenceNotFound => InvariantName::Hallucination,
            ViolationType::PolarityConflict => InvariantName::Contradiction,
        };
        Violation {
            journal_id: journal.to_string(),
            item_index: 0,
            invariant_name,
            violation_type: kind,
            details: String::new(),
            severity: AlertLevel::Critical,
            evidence_span: span.to_string(),
        }
    }

    fn report(violations: Vec<Violation>) -> InvariantReport {
        InvariantReport {
            run_id: "inv-test".to_string(),
            timestamp: Utc::now(),
            total_items: 20,
            total_journals: 10,
            schema_validity_rate: 1.0,
            evidence_validity_rate: 1.0,
            hallucination_rate: 0.0,
            contradiction_rate: 0.0,
            violations,
            alerts: Vec::new(),
            thresholds: InvariantThresholds::default(),
            definitions: Vec::new(),
        }
    }

    #[test]
    fn no_violations_no_diagnosis() {
        let d = diagnose(&report(Vec::new()));
        assert!(d.is_empty());
        assert_eq!(d.severity, DiagnosisSeverity::None);
    }

    #[test]
    fn repeated_span_is_systematic() {
        let vs = (0..3)
            .map(|i| violation(&format!("j{i}"), ViolationType::EvidenceNotFound, "headache"))
            .collect();
        let d = diagnose(&report(vs));
        assert_eq!(d.severity, DiagnosisSeverity::High);
        assert!(matches!(
            &d.patterns_detected[0],
            DetectedPattern::SystematicHallucination { pattern, occurrences: 3, .. } if pattern == "headache"
        ));
    }

    #[test]
    fn two_occurrences_are_not_systematic() {
        let vs = (0..2)
            .map(|i| violation(&format!("j{i}"), ViolationType::EvidenceNotFound, "headache"))
            .collect();
        assert!(diagnose(&report(vs)).is_empty());
    }

    #[test]
    fn only_top_three_spans_reported() {
        let mut vs = Vec::new();
        for (span, n) in [("a", 6), ("b", 5), ("c", 4), ("d", 3)] {
            for i in 0..n {
                vs.push(violation(&format!("{span}{i}"), ViolationType::EvidenceNotFound, span));
            }
        }
        let d = diagnose(&report(vs));
        let spans: Vec<&str> = d
            .patterns_detected
            .iter()
            .filter_map(|p| match p {
                DetectedPattern::SystematicHallucination { pattern, .. } => Some(pattern.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(spans, vec!["a", "b", "c"]);
    }

    #[test]
    fn polarity_confusion_is_medium() {
        let vs = vec![
            violation("j1", ViolationType::PolarityConflict, "pain"),
            violation("j2", ViolationType::PolarityConflict, "nausea"),
        ];
        let d = diagnose(&report(vs));
        assert_eq!(d.severity, DiagnosisSeverity::Medium);
        assert_eq!(d.recommended_actions.len(), 1);
    }

    #[test]
    fn hot_journal_does_not_raise_severity() {
        let vs = vec![
            violation("j1", ViolationType::SchemaError, "a"),
            violation("j1", ViolationType::SchemaError, "b"),
            violation("j1", ViolationType::SchemaError, "c"),
        ];
        let d = diagnose(&report(vs));
        assert_eq!(d.severity, DiagnosisSeverity::None);
        assert!(matches!(
            &d.patterns_detected[0],
            DetectedPattern::HotJournal { journal_id, violations: 3, .. } if journal_id == "j1"
        ));
    }
}
