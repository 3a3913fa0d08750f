//! Turns invariant violations into review items.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use ashwam_core::config::HumanReviewConfig;
use ashwam_core::constants::{DEFAULT_REVIEW_CONFIDENCE, REVIEW_ID_SUFFIX_LEN};
use ashwam_core::models::{ExtractionSnapshot, InvariantReport, Violation};

use crate::item::{ReviewItem, ReviewState};
use crate::queue::ReviewQueue;

/// `rev-<8 hex>`.
pub fn review_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("rev-{}", &hex[..REVIEW_ID_SUFFIX_LEN])
}

/// One pending review item per violation, created at `now`.
///
/// Confidence comes from the flagged item in `snapshots`; when the item
/// cannot be found it falls back to 0.5.
pub fn build_review_queue(
    report: &InvariantReport,
    snapshots: &[ExtractionSnapshot],
    config: HumanReviewConfig,
    now: DateTime<Utc>,
) -> ReviewQueue {
    let _span = ashwam_core::review_span!("build").entered();
    let by_id: HashMap<&str, &ExtractionSnapshot> = snapshots
        .iter()
        .map(|s| (s.journal_id.as_str(), s))
        .collect();

    let mut queue = ReviewQueue::new(config);
    for violation in &report.violations {
        let confidence = lookup_confidence(&by_id, violation);
        queue.add(ReviewItem {
            id: review_id(),
            journal_id: violation.journal_id.clone(),
            item_index: violation.item_index,
            violation_type: violation.violation_type,
            severity: violation.severity,
            evidence_span: violation.evidence_span.clone(),
            details: violation.details.clone(),
            confidence,
            created_at: now,
            state: ReviewState::Pending,
            assigned_to: None,
            notes: String::new(),
            reviewed_at: None,
        });
    }
    tracing::info!(items = queue.len(), "review queue built");
    queue
}

fn lookup_confidence(by_id: &HashMap<&str, &ExtractionSnapshot>, violation: &Violation) -> f64 {
    by_id
        .get(violation.journal_id.as_str())
        .and_then(|s| s.items.get(violation.item_index))
        .map(|item| item.confidence)
        .filter(|c| (0.0..=1.0).contains(c))
        .unwrap_or(DEFAULT_REVIEW_CONFIDENCE)
}
