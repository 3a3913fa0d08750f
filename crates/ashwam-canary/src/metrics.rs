//! Precision, recall, F1, and evidence agreement over matched pairs.

use ashwam_validation::evidence_exists;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Prf {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Micro-averaged scores from pooled counts. Zero denominators give 0.0.
pub fn precision_recall_f1(matched: usize, missed: usize, extra: usize) -> Prf {
    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
    let precision = ratio(matched, matched + extra);
    let recall = ratio(matched, matched + missed);
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    Prf {
        precision,
        recall,
        f1,
    }
}

/// Share of matched `(parser_span, gold_span)` pairs whose parser span
/// grounds in the gold span. 0.0 with no pairs.
pub fn evidence_match_rate<'a, I>(pairs: I) -> f64
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let (mut total, mut grounded) = (0usize, 0usize);
    for (parser_span, gold_span) in pairs {
        total += 1;
        if evidence_exists(parser_span, gold_span) {
            grounded += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        grounded as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_match_scores_one() {
        let prf = precision_recall_f1(5, 0, 0);
        assert_eq!(prf, Prf { precision: 1.0, recall: 1.0, f1: 1.0 });
    }

    #[test]
    fn no_matches_scores_zero() {
        assert_eq!(precision_recall_f1(0, 3, 2).f1, 0.0);
        assert_eq!(precision_recall_f1(0, 0, 0), Prf::default());
    }

    #[test]
    fn f1_is_harmonic_mean() {
        let prf = precision_recall_f1(2, 2, 0);
        assert_eq!(prf.precision, 1.0);
        assert_eq!(prf.recall, 0.5);
        assert!((prf.f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn evidence_rate_over_pairs() {
        let pairs = [("no cramps", "no cramps"), ("bloated stomach", "mild headache")];
        assert_eq!(evidence_match_rate(pairs), 0.5);
        assert_eq!(evidence_match_rate(std::iter::empty()), 0.0);
    }
}
