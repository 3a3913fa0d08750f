//! # ashwam-review
//!
//! Human-in-the-loop review of invariant violations under a limited daily
//! budget. Items are prioritised by severity, age, and extractor confidence;
//! critical items bypass the budget and stale items escalate.

pub mod builder;
pub mod item;
pub mod queue;

pub use builder::build_review_queue;
pub use item::{ReviewItem, ReviewState};
pub use queue::{QueueSummary, ReviewQueue, SharedReviewQueue};
