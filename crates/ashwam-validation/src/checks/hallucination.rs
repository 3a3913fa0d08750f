//! Hallucination: evidence spans that do not occur in their own journal.

use std::collections::HashMap;

use ashwam_core::models::{Domain, ExtractionSnapshot, JournalIndex};

use crate::grounding::evidence_exists;

/// One ungrounded item.
#[derive(Debug, Clone, PartialEq)]
pub struct Hallucination {
    pub journal_id: String,
    pub item_index: usize,
    pub evidence_span: String,
    pub domain: Domain,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HallucinationResult {
    /// Ungrounded items / total items. 0.0 when there are no items.
    pub rate: f64,
    pub hallucinations: Vec<Hallucination>,
    /// Evidence span -> occurrence count, ordered by count desc then span.
    pub clusters: Vec<(String, usize)>,
}

impl HallucinationResult {
    /// 1 - hallucination rate. 1.0 when there are no items.
    pub fn evidence_validity_rate(&self) -> f64 {
        1.0 - self.rate
    }

    /// Clusters that appear more than once.
    pub fn systematic(&self) -> impl Iterator<Item = &(String, usize)> {
        self.clusters.iter().filter(|(_, count)| *count > 1)
    }
}

/// Ground every item against its journal. A missing journal grounds nothing.
pub fn find_hallucinations(
    snapshots: &[ExtractionSnapshot],
    journals: &JournalIndex,
) -> HallucinationResult {
    let mut total = 0usize;
    let mut hallucinations = Vec::new();

    for snapshot in snapshots {
        let source = journals
            .get(&snapshot.journal_id)
            .map(String::as_str)
            .unwrap_or("");

        for (idx, item) in snapshot.items.iter().enumerate() {
            total += 1;
            if !evidence_exists(&item.evidence_span, source) {
                hallucinations.push(Hallucination {
                    journal_id: snapshot.journal_id.clone(),
                    item_index: idx,
                    evidence_span: item.evidence_span.clone(),
                    domain: item.domain,
                });
            }
        }
    }

    let rate = if total == 0 {
        0.0
    } else {
        hallucinations.len() as f64 / total as f64
    };

    HallucinationResult {
        rate,
        clusters: cluster_spans(&hallucinations),
        hallucinations,
    }
}

fn cluster_spans(hallucinations: &[Hallucination]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for h in hallucinations {
        *counts.entry(h.evidence_span.as_str()).or_default() += 1;
    }
    let mut clusters: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(span, count)| (span.to_string(), count))
        .collect();
    clusters.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    clusters
}
