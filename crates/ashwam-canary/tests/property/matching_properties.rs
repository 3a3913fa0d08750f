use std::collections::HashSet;

use ashwam_canary::matcher::match_items;
use ashwam_canary::metrics::precision_recall_f1;
use ashwam_core::models::{Domain, ExtractedItem, GoldItem, Polarity};
use proptest::prelude::*;

const SPANS: [&str; 5] = ["headache", "mild headache", "oatmeal", "tired", "no cramps"];

fn domain(i: u8) -> Domain {
    if i % 2 == 0 {
        Domain::Symptom
    } else {
        Domain::Food
    }
}

fn polarity(present: bool) -> Polarity {
    if present {
        Polarity::Present
    } else {
        Polarity::Absent
    }
}

fn parser_item((span, d, present): (usize, u8, bool)) -> ExtractedItem {
    ExtractedItem {
        domain: domain(d),
        text: String::new(),
        evidence_span: SPANS[span].to_string(),
        polarity: polarity(present),
        time_bucket: "today".to_string(),
        intensity_bucket: None,
        arousal_bucket: None,
        confidence: 0.9,
    }
}

fn gold_item((span, d, present): (usize, u8, bool)) -> GoldItem {
    GoldItem {
        domain: domain(d),
        evidence_span: SPANS[span].to_string(),
        polarity: polarity(present),
        time_bucket: "today".to_string(),
        intensity_bucket: None,
        arousal_bucket: None,
    }
}

fn item_shape() -> impl Strategy<Value = (usize, u8, bool)> {
    (0..SPANS.len(), 0u8..2, any::<bool>())
}

proptest! {
    #[test]
    fn f1_lies_between_precision_and_recall(matched in 0usize..50, missed in 0usize..50, extra in 0usize..50) {
        let prf = precision_recall_f1(matched, missed, extra);
        for v in [prf.precision, prf.recall, prf.f1] {
            prop_assert!((0.0..=1.0).contains(&v));
        }
        if matched > 0 {
            prop_assert!(prf.f1 <= prf.precision.max(prf.recall) + 1e-12);
            prop_assert!(prf.f1 + 1e-12 >= prf.precision.min(prf.recall));
        } else {
            prop_assert_eq!(prf.f1, 0.0);
        }
    }

    #[test]
    fn matching_accounts_for_every_item(
        parser in prop::collection::vec(item_shape(), 0..8),
        gold in prop::collection::vec(item_shape(), 0..8),
    ) {
        let parser: Vec<ExtractedItem> = parser.into_iter().map(parser_item).collect();
        let gold: Vec<GoldItem> = gold.into_iter().map(gold_item).collect();
        let result = match_items(&parser, &gold);

        prop_assert_eq!(result.matched() + result.missed, gold.len());
        prop_assert_eq!(result.matched() + result.extra, parser.len());

        let parser_used: HashSet<usize> = result.pairs.iter().map(|p| p.parser_index).collect();
        let gold_used: HashSet<usize> = result.pairs.iter().map(|p| p.gold_index).collect();
        prop_assert_eq!(parser_used.len(), result.matched());
        prop_assert_eq!(gold_used.len(), result.matched());
    }

    #[test]
    fn identical_sets_match_completely(shape in prop::collection::vec(item_shape(), 0..8)) {
        let parser: Vec<ExtractedItem> = shape.iter().copied().map(parser_item).collect();
        let gold: Vec<GoldItem> = shape.into_iter().map(gold_item).collect();
        let result = match_items(&parser, &gold);
        prop_assert_eq!(result.matched(), gold.len());
    }
}
