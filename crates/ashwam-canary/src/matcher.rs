//! One-to-one matching of extracted items against gold items.
//!
//! A parser item and a gold item are candidates when they share domain and
//! polarity and their spans are compatible: equal after normalization, or
//! the parser span grounds in the gold span. Per journal the matching is maximum cardinality
//! (augmenting paths), trying exact-span candidates first.

use ashwam_core::models::{ExtractedItem, GoldItem};
use ashwam_validation::evidence_exists;

/// A matched (parser, gold) pair by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedPair {
    pub parser_index: usize,
    pub gold_index: usize,
}

/// Matching outcome for one journal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JournalMatch {
    /// Sorted by gold index.
    pub pairs: Vec<MatchedPair>,
    /// Gold items left unmatched.
    pub missed: usize,
    /// Parser items left unmatched.
    pub extra: usize,
}

impl JournalMatch {
    pub fn matched(&self) -> usize {
        self.pairs.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanFit {
    Exact,
    Grounded,
}

fn span_fit(parser: &ExtractedItem, gold: &GoldItem) -> Option<SpanFit> {
    let p = parser.normalized_span();
    let g = gold.normalized_span();
    if p.is_empty() || g.is_empty() {
        return None;
    }
    if p == g {
        Some(SpanFit::Exact)
    } else if evidence_exists(&p, &g) {
        Some(SpanFit::Grounded)
    } else {
        None
    }
}

/// Whether `parser` may be matched to `gold`.
pub fn is_candidate(parser: &ExtractedItem, gold: &GoldItem) -> bool {
    parser.domain == gold.domain && parser.polarity == gold.polarity && span_fit(parser, gold).is_some()
}

/// Maximum one-to-one matching between `parser` and `gold` items.
pub fn match_items(parser: &[ExtractedItem], gold: &[GoldItem]) -> JournalMatch {
    // Candidate parser indices per gold item, exact spans first, then item order.
    let candidates: Vec<Vec<usize>> = gold
        .iter()
        .map(|g| {
            let mut exact = Vec::new();
            let mut grounded = Vec::new();
            for (pi, p) in parser.iter().enumerate() {
                if p.domain != g.domain || p.polarity != g.polarity {
                    continue;
                }
                match span_fit(p, g) {
                    Some(SpanFit::Exact) => exact.push(pi),
                    Some(SpanFit::Grounded) => grounded.push(pi),
                    None => {}
                }
            }
            exact.extend(grounded);
            exact
        })
        .collect();

    let mut owner: Vec<Option<usize>> = vec![None; parser.len()];
    for gi in 0..gold.len() {
        let mut visited = vec![false; parser.len()];
        augment(gi, &candidates, &mut owner, &mut visited);
    }

    let mut pairs: Vec<MatchedPair> = owner
        .iter()
        .enumerate()
        .filter_map(|(pi, g)| {
            g.map(|gi| MatchedPair {
                parser_index: pi,
                gold_index: gi,
            })
        })
        .collect();
    pairs.sort_by_key(|p| p.gold_index);

    JournalMatch {
        missed: gold.len() - pairs.len(),
        extra: parser.len() - pairs.len(),
        pairs,
    }
}

/// Kuhn's augmenting path step for gold item `gi`.
fn augment(
    gi: usize,
    candidates: &[Vec<usize>],
    owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &pi in &candidates[gi] {
        if visited[pi] {
            continue;
        }
        visited[pi] = true;
        let free = match owner[pi] {
            None => true,
            Some(other) => augment(other, candidates, owner, visited),
        };
        if free {
            owner[pi] = Some(gi);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use ashwam_core::models::{Domain, IntensityBucket, Polarity};

    fn parser_item(span: &str, polarity: Polarity) -> ExtractedItem {
        ExtractedItem {
            domain: Domain::Symptom,
            text: String::new(),
            evidence_span: span.into(),
            polarity,
            time_bucket: "today".into(),
            intensity_bucket: Some(IntensityBucket::Low),
            arousal_bucket: None,
            confidence: 0.9,
        }
    }

    fn gold_item(span: &str, polarity: Polarity) -> GoldItem {
        GoldItem {
            domain: Domain::Symptom,
            evidence_span: span.into(),
            polarity,
            time_bucket: "today".into(),
            intensity_bucket: Some(IntensityBucket::Low),
            arousal_bucket: None,
        }
    }

    #[test]
    fn polarity_must_agree() {
        assert!(!is_candidate(
            &parser_item("cramps", Polarity::Present),
            &gold_item("cramps", Polarity::Absent)
        ));
    }

    #[test]
    fn longer_parser_span_grounds_in_gold() {
        assert!(is_candidate(
            &parser_item("no cramps today", Polarity::Absent),
            &gold_item("no cramps", Polarity::Absent)
        ));
    }

    #[test]
    fn gold_inside_longer_parser_span_is_not_a_candidate() {
        assert!(!is_candidate(
            &parser_item("bad headache", Polarity::Present),
            &gold_item("headache", Polarity::Present)
        ));
    }

    #[test]
    fn augmenting_path_finds_maximum_matching() {
        // Taking the first candidate would give parser 0 to gold 0 and leave
        // gold 1, which only fits parser 0, unmatched.
        let parser = vec![
            parser_item("back pain", Polarity::Present),
            parser_item("lower back aches", Polarity::Present),
        ];
        let gold = vec![
            gold_item("lower back pain", Polarity::Present),
            gold_item("back pain", Polarity::Present),
        ];
        let m = match_items(&parser, &gold);
        assert_eq!(m.matched(), 2);
        assert_eq!(m.missed, 0);
        assert_eq!(m.extra, 0);
        assert_eq!(
            m.pairs,
            vec![
                MatchedPair { parser_index: 1, gold_index: 0 },
                MatchedPair { parser_index: 0, gold_index: 1 },
            ]
        );
    }

    #[test]
    fn items_match_at_most_once() {
        let parser = vec![parser_item("headache", Polarity::Present)];
        let gold = vec![
            gold_item("headache", Polarity::Present),
            gold_item("headache", Polarity::Present),
        ];
        let m = match_items(&parser, &gold);
        assert_eq!(m.matched(), 1);
        assert_eq!(m.missed, 1);
        assert_eq!(m.pairs[0].gold_index, 0);
    }

    #[test]
    fn empty_sides() {
        let m = match_items(&[], &[gold_item("x", Polarity::Present)]);
        assert_eq!(m.missed, 1);
        let m = match_items(&[parser_item("x", Polarity::Present)], &[]);
        assert_eq!(m.extra, 1);
    }
}
