//! Review items and their lifecycle.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ashwam_core::models::{AlertLevel, ViolationType};

/// Lifecycle: `Pending -> InReview -> {Approved | Rejected}`, or
/// `Pending -> {Approved | Rejected | Escalated}` directly.
/// Nothing ever returns to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    Pending,
    InReview,
    Approved,
    Rejected,
    Escalated,
}

impl ReviewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InReview => "in_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Escalated => "escalated",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Escalated)
    }

    pub fn can_transition_to(&self, next: ReviewState) -> bool {
        use ReviewState::*;
        matches!(
            (self, next),
            (Pending, InReview)
                | (Pending, Approved)
                | (Pending, Rejected)
                | (Pending, Escalated)
                | (InReview, Approved)
                | (InReview, Rejected)
        )
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One violation awaiting a human decision. Owned by the queue, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub id: String,
    pub journal_id: String,
    pub item_index: usize,
    pub violation_type: ViolationType,
    pub severity: AlertLevel,
    pub evidence_span: String,
    pub details: String,
    /// Extractor confidence of the flagged item.
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
    pub state: ReviewState,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl ReviewItem {
    /// Hours since creation, never negative.
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        let seconds = (now - self.created_at).num_milliseconds() as f64 / 1000.0;
        (seconds / 3600.0).max(0.0)
    }
}
