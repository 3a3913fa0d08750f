//! Schema validity: domain-required buckets, confidence range, evidence present.

use ashwam_core::models::{ExtractedItem, ExtractionSnapshot};

/// Schema problems for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaIssue {
    pub journal_id: String,
    pub item_index: usize,
    pub evidence_span: String,
    pub errors: Vec<String>,
}

impl SchemaIssue {
    /// All errors joined with `"; "`.
    pub fn details(&self) -> String {
        self.errors.join("; ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaResult {
    /// Valid items / total items. 1.0 when there are no items.
    pub validity_rate: f64,
    pub issues: Vec<SchemaIssue>,
}

/// Check one item. Errors accumulate; an empty list means the item is valid.
pub fn check_item_schema(item: &ExtractedItem) -> Vec<String> {
    let mut errors = Vec::new();

    if item.domain.requires_arousal() {
        if item.arousal_bucket.is_none() {
            errors.push(format!("{} item missing arousal_bucket", item.domain));
        }
    } else if item.intensity_bucket.is_none() {
        errors.push(format!("{} item missing intensity_bucket", item.domain));
    }

    if !item.confidence_in_range() {
        errors.push(format!("confidence out of range: {}", item.confidence));
    }

    if item.evidence_span.trim().is_empty() {
        errors.push("empty evidence span".to_string());
    }

    errors
}

/// Schema validity over every item of every snapshot.
pub fn compute_schema_validity(snapshots: &[ExtractionSnapshot]) -> SchemaResult {
    let mut total = 0usize;
    let mut issues = Vec::new();

    for snapshot in snapshots {
        for (idx, item) in snapshot.items.iter().enumerate() {
            total += 1;
            let errors = check_item_schema(item);
            if !errors.is_empty() {
                issues.push(SchemaIssue {
                    journal_id: snapshot.journal_id.clone(),
                    item_index: idx,
                    evidence_span: item.evidence_span.clone(),
                    errors,
                });
            }
        }
    }

    let validity_rate = if total == 0 {
        1.0
    } else {
        (total - issues.len()) as f64 / total as f64
    };

    SchemaResult {
        validity_rate,
        issues,
    }
}
