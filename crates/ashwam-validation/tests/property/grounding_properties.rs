use ashwam_core::models::{Domain, ExtractedItem, ExtractionSnapshot, IntensityBucket, Polarity};
use ashwam_validation::checks::contradiction::find_contradictions;
use ashwam_validation::evidence_exists;
use proptest::prelude::*;

fn item(span: &str, polarity: Polarity) -> ExtractedItem {
    ExtractedItem {
        domain: Domain::Symptom,
        text: String::new(),
        evidence_span: span.to_string(),
        polarity,
        time_bucket: "today".to_string(),
        intensity_bucket: Some(IntensityBucket::Low),
        arousal_bucket: None,
        confidence: 0.7,
    }
}

proptest! {
    #[test]
    fn literal_substring_is_grounded(
        prefix in "[a-z ]{0,30}",
        span in "[a-z]{1,8}( [a-z]{1,8}){0,3}",
        suffix in "[a-z ]{0,30}",
    ) {
        let source = format!("{prefix}{span}{suffix}");
        prop_assert!(evidence_exists(&span, &source));
        prop_assert!(evidence_exists(&span.to_uppercase(), &source));
    }

    #[test]
    fn truncated_prefix_over_five_chars_is_grounded(
        head in "[a-z]{3,8} [a-z]{3,8}",
        tail in "[0-9]{3,6}",
    ) {
        // The digits never appear in the source, so only the prefix rule can match.
        let source = format!("today {head} again");
        let span = format!("{head} {tail}");
        prop_assert!(evidence_exists(&span, &source));
    }

    #[test]
    fn conflicting_pairs_are_always_reported(span in "[a-z]{2,10}( [a-z]{2,10}){0,2}") {
        let snap = ExtractionSnapshot {
            journal_id: "j".to_string(),
            items: vec![
                item(&span, Polarity::Present),
                item(&span.to_uppercase(), Polarity::Absent),
            ],
        };
        let result = find_contradictions(&[snap]);
        prop_assert_eq!(result.contradictions.len(), 1);
        prop_assert_eq!(result.flagged_items(), 2);
    }

    #[test]
    fn agreeing_spans_never_conflict(
        span in "[a-z]{2,10}",
        n in 2usize..6,
        absent in any::<bool>(),
    ) {
        let polarity = if absent { Polarity::Absent } else { Polarity::Present };
        let snap = ExtractionSnapshot {
            journal_id: "j".to_string(),
            items: (0..n).map(|_| item(&span, polarity)).collect(),
        };
        prop_assert!(find_contradictions(&[snap]).contradictions.is_empty());
    }
}
