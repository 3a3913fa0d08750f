//! Priority queue over review items.
//!
//! priority = severity_weight x min(2, 1 + age_h / 24) x (1 - confidence)
//!
//! Every time-dependent method has an `_at(now)` form; the plain form uses
//! the wall clock.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

use ashwam_core::config::HumanReviewConfig;
use ashwam_core::errors::ReviewError;
use ashwam_core::models::AlertLevel;

use crate::item::{ReviewItem, ReviewState};

const MAX_AGE_FACTOR: f64 = 2.0;

/// A queue shared between reviewers.
pub type SharedReviewQueue = Arc<Mutex<ReviewQueue>>;

/// Queue state for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueSummary {
    pub total_items: usize,
    pub total_pending: usize,
    pub critical_pending: usize,
    pub daily_batch_size: usize,
    pub by_state: BTreeMap<ReviewState, usize>,
}

#[derive(Debug, Clone)]
pub struct ReviewQueue {
    items: Vec<ReviewItem>,
    config: HumanReviewConfig,
}

impl ReviewQueue {
    pub fn new(config: HumanReviewConfig) -> Self {
        Self {
            items: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &HumanReviewConfig {
        &self.config
    }

    pub fn into_shared(self) -> SharedReviewQueue {
        Arc::new(Mutex::new(self))
    }

    pub fn add(&mut self, item: ReviewItem) {
        tracing::debug!(id = %item.id, severity = %item.severity, "review item queued");
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every item ever added, in insertion order.
    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&ReviewItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn priority_score(&self, item: &ReviewItem) -> f64 {
        self.priority_score_at(item, Utc::now())
    }

    pub fn priority_score_at(&self, item: &ReviewItem, now: DateTime<Utc>) -> f64 {
        let weight = self.config.severity_weight(item.severity);
        let age_factor = (1.0 + item.age_hours(now) / 24.0).min(MAX_AGE_FACTOR);
        let confidence_factor = 1.0 - item.confidence;
        weight * age_factor * confidence_factor
    }

    pub fn pending(&self) -> Vec<&ReviewItem> {
        self.items
            .iter()
            .filter(|i| i.state == ReviewState::Pending)
            .collect()
    }

    pub fn daily_batch(&self) -> Vec<&ReviewItem> {
        self.daily_batch_at(Utc::now())
    }

    /// Top `max_daily_reviews` pending items by descending priority.
    /// Ties go to the older item, then the smaller id.
    pub fn daily_batch_at(&self, now: DateTime<Utc>) -> Vec<&ReviewItem> {
        let mut scored: Vec<(f64, &ReviewItem)> = self
            .pending()
            .into_iter()
            .map(|item| (self.priority_score_at(item, now), item))
            .collect();
        scored.sort_by(|(sa, a), (sb, b)| {
            sb.total_cmp(sa)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        scored
            .into_iter()
            .take(self.config.max_daily_reviews)
            .map(|(_, item)| item)
            .collect()
    }

    /// All pending CRITICAL items, regardless of the daily cap.
    pub fn critical_items(&self) -> Vec<&ReviewItem> {
        self.items
            .iter()
            .filter(|i| i.state == ReviewState::Pending && i.severity == AlertLevel::Critical)
            .collect()
    }

    pub fn escalate_aged_items(&mut self) -> Vec<String> {
        self.escalate_aged_items_at(Utc::now())
    }

    /// Escalate pending items older than `escalation_timeout_hours`.
    /// Returns the escalated ids.
    pub fn escalate_aged_items_at(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let _span = ashwam_core::review_span!("escalate").entered();
        let timeout = self.config.escalation_timeout_hours as f64;
        let mut escalated = Vec::new();
        for item in &mut self.items {
            if item.state == ReviewState::Pending && item.age_hours(now) > timeout {
                item.state = ReviewState::Escalated;
                escalated.push(item.id.clone());
            }
        }
        if !escalated.is_empty() {
            tracing::warn!(count = escalated.len(), "review items escalated after timeout");
        }
        escalated
    }

    /// `Pending -> InReview`, assigning the reviewer.
    pub fn start_review(&mut self, id: &str, reviewer: &str) -> Result<(), ReviewError> {
        let item = self.transition(id, ReviewState::InReview)?;
        item.assigned_to = Some(reviewer.to_string());
        Ok(())
    }

    pub fn mark_reviewed(&mut self, id: &str, approved: bool, notes: &str) -> Result<(), ReviewError> {
        self.mark_reviewed_at(id, approved, notes, Utc::now())
    }

    /// `Pending | InReview -> Approved | Rejected`.
    pub fn mark_reviewed_at(
        &mut self,
        id: &str,
        approved: bool,
        notes: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ReviewError> {
        let next = if approved {
            ReviewState::Approved
        } else {
            ReviewState::Rejected
        };
        let item = self.transition(id, next)?;
        item.notes = notes.to_string();
        item.reviewed_at = Some(now);
        tracing::info!(id, state = %next, "review recorded");
        Ok(())
    }

    fn transition(&mut self, id: &str, next: ReviewState) -> Result<&mut ReviewItem, ReviewError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ReviewError::ItemNotFound { id: id.to_string() })?;
        if !item.state.can_transition_to(next) {
            return Err(ReviewError::InvalidTransition {
                id: id.to_string(),
                from: item.state.to_string(),
                to: next.to_string(),
            });
        }
        item.state = next;
        Ok(item)
    }

    pub fn summary(&self) -> QueueSummary {
        self.summary_at(Utc::now())
    }

    pub fn summary_at(&self, now: DateTime<Utc>) -> QueueSummary {
        let mut by_state = BTreeMap::new();
        for item in &self.items {
            *by_state.entry(item.state).or_insert(0) += 1;
        }
        QueueSummary {
            total_items: self.items.len(),
            total_pending: self.pending().len(),
            critical_pending: self.critical_items().len(),
            daily_batch_size: self.daily_batch_at(now).len(),
            by_state,
        }
    }
}
