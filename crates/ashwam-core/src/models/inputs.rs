//! Input records consumed by the engines.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::enums::{ArousalBucket, Domain, IntensityBucket, Polarity};

/// One claim pulled from a journal by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub domain: Domain,
    /// Free-text rendering of the claim. Not used by any check.
    #[serde(default)]
    pub text: String,
    pub evidence_span: String,
    pub polarity: Polarity,
    pub time_bucket: String,
    #[serde(default)]
    pub intensity_bucket: Option<IntensityBucket>,
    #[serde(default)]
    pub arousal_bucket: Option<ArousalBucket>,
    pub confidence: f64,
}

impl ExtractedItem {
    /// Lower-cased, trimmed evidence span used as a grouping key.
    pub fn normalized_span(&self) -> String {
        normalize_span(&self.evidence_span)
    }

    pub fn confidence_in_range(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence)
    }
}

/// Extractor output for one journal. Item order is significant:
/// violations refer to items by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSnapshot {
    pub journal_id: String,
    #[serde(default)]
    pub items: Vec<ExtractedItem>,
}

/// Raw journal text. Reference data, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub journal_id: String,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub lang_hint: Option<String>,
}

/// journal_id -> source text.
pub type JournalIndex = HashMap<String, String>;

/// Build a [`JournalIndex`]. Later duplicates win.
pub fn journal_index(journals: &[Journal]) -> JournalIndex {
    journals
        .iter()
        .map(|j| (j.journal_id.clone(), j.text.clone()))
        .collect()
}

/// A human-authored canary label. No free text, no confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldItem {
    pub domain: Domain,
    pub evidence_span: String,
    pub polarity: Polarity,
    pub time_bucket: String,
    #[serde(default)]
    pub intensity_bucket: Option<IntensityBucket>,
    #[serde(default)]
    pub arousal_bucket: Option<ArousalBucket>,
}

impl GoldItem {
    pub fn normalized_span(&self) -> String {
        normalize_span(&self.evidence_span)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldLabel {
    pub journal_id: String,
    #[serde(default)]
    pub items: Vec<GoldItem>,
}

pub(crate) fn normalize_span(span: &str) -> String {
    span.trim().to_lowercase()
}
