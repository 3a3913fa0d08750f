//! Contradiction: one journal, one normalized span, more than one polarity.

use std::collections::{HashMap, HashSet};

use ashwam_core::models::{Domain, ExtractionSnapshot, Polarity};

/// A member of a conflicting group.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictingItem {
    pub index: usize,
    pub polarity: Polarity,
    pub confidence: f64,
    pub domain: Domain,
}

/// One contradiction group within a journal.
#[derive(Debug, Clone, PartialEq)]
pub struct Contradiction {
    pub journal_id: String,
    /// Normalized (trimmed, lower-cased) span shared by the group.
    pub evidence_span: String,
    pub items: Vec<ConflictingItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContradictionResult {
    /// Contradiction groups / total items. 0.0 when there are no items.
    pub rate: f64,
    pub contradictions: Vec<Contradiction>,
}

impl ContradictionResult {
    /// Number of items involved in any contradiction.
    pub fn flagged_items(&self) -> usize {
        self.contradictions.iter().map(|c| c.items.len()).sum()
    }
}

/// Group each journal's items by normalized span and flag mixed polarities.
/// Groups are reported in order of first appearance.
pub fn find_contradictions(snapshots: &[ExtractionSnapshot]) -> ContradictionResult {
    let mut total = 0usize;
    let mut contradictions = Vec::new();

    for snapshot in snapshots {
        total += snapshot.items.len();

        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, item) in snapshot.items.iter().enumerate() {
            let key = item.normalized_span();
            groups
                .entry(key.clone())
                .or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                })
                .push(idx);
        }

        for key in order {
            let Some(indices) = groups.remove(&key) else {
                continue;
            };
            if indices.len() < 2 {
                continue;
            }
            let polarities: HashSet<Polarity> = indices
                .iter()
                .map(|&i| snapshot.items[i].polarity)
                .collect();
            if polarities.len() < 2 {
                continue;
            }
            contradictions.push(Contradiction {
                journal_id: snapshot.journal_id.clone(),
                evidence_span: key,
                items: indices
                    .iter()
                    .map(|&i| {
                        let item = &snapshot.items[i];
                        ConflictingItem {
                            index: i,
                            polarity: item.polarity,
                            confidence: item.confidence,
                            domain: item.domain,
                        }
                    })
                    .collect(),
            });
        }
    }

    let rate = if total == 0 {
        0.0
    } else {
        contradictions.len() as f64 / total as f64
    };

    ContradictionResult {
        rate,
        contradictions,
    }
}
