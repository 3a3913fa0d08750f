//! Shape of one snapshot set.
//!
//! Maps are `BTreeMap` so reports and divergence sums are deterministic.

use std::collections::BTreeMap;

use ashwam_core::constants::LOW_CONFIDENCE_CUTOFF;
use ashwam_core::models::{ExtractedItem, ExtractionSnapshot, IntensityBucket};

/// Category -> share. Shares sum to 1 unless the map is empty.
pub type Distribution = BTreeMap<String, f64>;

/// Category -> count.
pub type Counts = BTreeMap<String, u64>;

/// Flatten snapshots into their items, preserving order.
pub fn all_items(snapshots: &[ExtractionSnapshot]) -> Vec<&ExtractedItem> {
    snapshots.iter().flat_map(|s| s.items.iter()).collect()
}

pub fn domain_counts(items: &[&ExtractedItem]) -> Counts {
    count_by(items, |item| Some(item.domain.as_str()))
}

/// Arousal buckets of emotion items that carry one.
pub fn arousal_counts(items: &[&ExtractedItem]) -> Counts {
    count_by(items, |item| {
        if item.domain.requires_arousal() {
            item.arousal_bucket.map(|b| b.as_str())
        } else {
            None
        }
    })
}

/// Intensity buckets of non-emotion items that carry one.
pub fn intensity_counts(items: &[&ExtractedItem]) -> Counts {
    count_by(items, |item| {
        if item.domain.requires_arousal() {
            None
        } else {
            item.intensity_bucket.map(|b| b.as_str())
        }
    })
}

fn count_by<F>(items: &[&ExtractedItem], key: F) -> Counts
where
    F: Fn(&ExtractedItem) -> Option<&'static str>,
{
    let mut counts = Counts::new();
    for item in items {
        if let Some(k) = key(item) {
            *counts.entry(k.to_string()).or_default() += 1;
        }
    }
    counts
}

/// Counts to shares. Empty in, empty out.
pub fn normalize(counts: &Counts) -> Distribution {
    let total: u64 = counts.values().sum();
    if total == 0 {
        return Distribution::new();
    }
    counts
        .iter()
        .map(|(k, &v)| (k.clone(), v as f64 / total as f64))
        .collect()
}

pub fn domain_distribution(items: &[&ExtractedItem]) -> Distribution {
    normalize(&domain_counts(items))
}

pub fn arousal_distribution(items: &[&ExtractedItem]) -> Distribution {
    normalize(&arousal_counts(items))
}

pub fn intensity_distribution(items: &[&ExtractedItem]) -> Distribution {
    normalize(&intensity_counts(items))
}

/// Whether the extractor hedged on this item: unknown intensity, emotion
/// without arousal, or confidence below 0.5.
pub fn is_uncertain(item: &ExtractedItem) -> bool {
    item.intensity_bucket == Some(IntensityBucket::Unknown)
        || (item.domain.requires_arousal() && item.arousal_bucket.is_none())
        || item.confidence < LOW_CONFIDENCE_CUTOFF
}

/// Share of uncertain items. 0.0 for no items.
pub fn uncertainty_rate(items: &[&ExtractedItem]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let uncertain = items.iter().filter(|item| is_uncertain(item)).count();
    uncertain as f64 / items.len() as f64
}

/// Raw confidence values, in item order.
pub fn confidence_samples(items: &[&ExtractedItem]) -> Vec<f64> {
    items.iter().map(|item| item.confidence).collect()
}

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Items-per-journal statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VolumeStats {
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    /// Share of journals with zero items.
    pub zero_rate: f64,
    pub total_items: usize,
    pub total_journals: usize,
}

impl VolumeStats {
    /// All zeros for no journals.
    pub fn from_snapshots(snapshots: &[ExtractionSnapshot]) -> Self {
        if snapshots.is_empty() {
            return Self::default();
        }
        let counts: Vec<f64> = snapshots.iter().map(|s| s.items.len() as f64).collect();
        let n = counts.len() as f64;
        let mean = mean(&counts);
        let variance = counts.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
        let zero = counts.iter().filter(|&&c| c == 0.0).count();

        Self {
            mean,
            std: variance.sqrt(),
            zero_rate: zero as f64 / n,
            total_items: snapshots.iter().map(|s| s.items.len()).sum(),
            total_journals: snapshots.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ashwam_core::models::{ArousalBucket, Domain, Polarity};

    fn item(domain: Domain, confidence: f64) -> ExtractedItem {
        ExtractedItem {
            domain,
            text: String::new(),
            evidence_span: "x".into(),
            polarity: Polarity::Present,
            time_bucket: "today".into(),
            intensity_bucket: (!domain.requires_arousal()).then_some(IntensityBucket::Low),
            arousal_bucket: domain.requires_arousal().then_some(ArousalBucket::High),
            confidence,
        }
    }

    #[test]
    fn domain_shares_sum_to_one() {
        let items = [item(Domain::Food, 0.9), item(Domain::Food, 0.9), item(Domain::Mind, 0.9)];
        let refs: Vec<&ExtractedItem> = items.iter().collect();
        let dist = domain_distribution(&refs);
        assert!((dist["food"] - 2.0 / 3.0).abs() < 1e-12);
        assert!((dist.values().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn arousal_ignores_non_emotion_items() {
        let items = [item(Domain::Emotion, 0.9), item(Domain::Symptom, 0.9)];
        let refs: Vec<&ExtractedItem> = items.iter().collect();
        let dist = arousal_distribution(&refs);
        assert_eq!(dist.len(), 1);
        assert_eq!(dist["high"], 1.0);
        assert_eq!(intensity_distribution(&refs)["low"], 1.0);
    }

    #[test]
    fn uncertainty_counts_each_item_once() {
        let mut hedged = item(Domain::Emotion, 0.3);
        hedged.arousal_bucket = None;
        let items = [hedged, item(Domain::Food, 0.9)];
        let refs: Vec<&ExtractedItem> = items.iter().collect();
        assert_eq!(uncertainty_rate(&refs), 0.5);
        assert_eq!(uncertainty_rate(&[]), 0.0);
    }

    #[test]
    fn volume_stats() {
        let snaps = vec![
            ExtractionSnapshot { journal_id: "a".into(), items: vec![] },
            ExtractionSnapshot {
                journal_id: "b".into(),
                items: vec![item(Domain::Food, 0.9), item(Domain::Food, 0.9)],
            },
        ];
        let v = VolumeStats::from_snapshots(&snaps);
        assert_eq!(v.mean, 1.0);
        assert_eq!(v.std, 1.0);
        assert_eq!(v.zero_rate, 0.5);
        assert_eq!(v.total_items, 2);
        assert_eq!(VolumeStats::from_snapshots(&[]), VolumeStats::default());
    }
}
