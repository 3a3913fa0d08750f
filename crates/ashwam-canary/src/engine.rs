//! CanaryEngine: match, score, decide.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use ashwam_core::config::CanaryThresholds;
use ashwam_core::models::{
    generate_run_id, CanaryJournalResult, CanaryReport, ExtractionSnapshot, GoldLabel,
};

use crate::actions::{determine_action, CanarySignals};
use crate::matcher::match_items;
use crate::metrics::{evidence_match_rate, precision_recall_f1};

#[derive(Debug, Clone, Default)]
pub struct CanaryEngine {
    thresholds: CanaryThresholds,
}

impl CanaryEngine {
    pub fn new(thresholds: CanaryThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &CanaryThresholds {
        &self.thresholds
    }

    /// Evaluate `outputs` against `gold`.
    ///
    /// Journals are scored in gold order. A gold journal with no output counts
    /// every gold item as missed; output journals absent from gold are ignored.
    pub fn evaluate(&self, outputs: &[ExtractionSnapshot], gold: &[GoldLabel]) -> CanaryReport {
        self.evaluate_at(outputs, gold, Utc::now())
    }

    /// [`evaluate`](Self::evaluate) with an explicit timestamp.
    pub fn evaluate_at(
        &self,
        outputs: &[ExtractionSnapshot],
        gold: &[GoldLabel],
        now: DateTime<Utc>,
    ) -> CanaryReport {
        let run_id = generate_run_id("canary", now);
        let span = ashwam_core::canary_span!(run_id, gold.len());
        let _guard = span.enter();

        let by_id: HashMap<&str, &ExtractionSnapshot> =
            outputs.iter().map(|s| (s.journal_id.as_str(), s)).collect();

        let mut per_journal = Vec::with_capacity(gold.len());
        let mut span_pairs: Vec<(&str, &str)> = Vec::new();
        let (mut matched, mut missed, mut extra) = (0usize, 0usize, 0usize);

        for label in gold {
            let parser_items = by_id
                .get(label.journal_id.as_str())
                .map(|s| s.items.as_slice())
                .unwrap_or(&[]);
            let m = match_items(parser_items, &label.items);

            span_pairs.extend(m.pairs.iter().map(|p| {
                (
                    parser_items[p.parser_index].evidence_span.as_str(),
                    label.items[p.gold_index].evidence_span.as_str(),
                )
            }));
            matched += m.matched();
            missed += m.missed;
            extra += m.extra;

            tracing::debug!(
                journal_id = %label.journal_id,
                matched = m.matched(),
                missed = m.missed,
                extra = m.extra,
                "canary journal scored"
            );
            per_journal.push(CanaryJournalResult {
                journal_id: label.journal_id.clone(),
                gold_count: label.items.len(),
                parser_count: parser_items.len(),
                matched: m.matched(),
                missed: m.missed,
                extra: m.extra,
            });
        }

        let prf = precision_recall_f1(matched, missed, extra);
        let evidence_rate = evidence_match_rate(span_pairs);
        let signals = CanarySignals {
            f1: prf.f1,
            evidence_match_rate: evidence_rate,
            matched_pairs: matched,
            gold_items: gold.iter().map(|g| g.items.len()).sum(),
        };
        let (action, action_reason) = determine_action(&signals, &self.thresholds);

        tracing::info!(
            precision = prf.precision,
            recall = prf.recall,
            f1 = prf.f1,
            evidence_match_rate = evidence_rate,
            action = %action,
            "canary evaluation complete"
        );

        CanaryReport {
            run_id,
            timestamp: now,
            precision: prf.precision,
            recall: prf.recall,
            f1: prf.f1,
            evidence_match_rate: evidence_rate,
            matched_count: matched,
            missed_count: missed,
            extra_count: extra,
            action,
            action_reason,
            per_journal,
            thresholds: self.thresholds,
        }
    }
}
