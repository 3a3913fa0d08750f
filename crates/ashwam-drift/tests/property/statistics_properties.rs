use ashwam_drift::distribution::Distribution;
use ashwam_drift::{jensen_shannon_divergence, ks_two_sample};
use proptest::prelude::*;

fn to_dist(weights: &[f64]) -> Distribution {
    let total: f64 = weights.iter().sum();
    weights
        .iter()
        .enumerate()
        .map(|(i, w)| (format!("k{i}"), w / total))
        .collect()
}

proptest! {
    #[test]
    fn jsd_identity(weights in prop::collection::vec(0.01f64..1.0, 1..6)) {
        let p = to_dist(&weights);
        prop_assert!(jensen_shannon_divergence(&p, &p).abs() < 1e-9);
    }

    #[test]
    fn jsd_symmetric_and_bounded(
        a in prop::collection::vec(0.01f64..1.0, 4),
        b in prop::collection::vec(0.01f64..1.0, 4),
    ) {
        let p = to_dist(&a);
        let q = to_dist(&b);
        let pq = jensen_shannon_divergence(&p, &q);
        let qp = jensen_shannon_divergence(&q, &p);
        prop_assert!((pq - qp).abs() < 1e-12);
        prop_assert!(pq >= 0.0);
        prop_assert!(pq <= std::f64::consts::LN_2 + 1e-9);
    }

    #[test]
    fn jsd_grows_as_mass_moves_away(step in 0.05f64..0.45) {
        // q moves mass from "a" to "b"; further moves diverge more from p.
        let p = to_dist(&[1.0, 1.0]);
        let near = to_dist(&[0.5 + step, 0.5 - step]);
        let far = to_dist(&[0.5 + step + 0.05, 0.5 - step - 0.05]);
        prop_assert!(jensen_shannon_divergence(&p, &far) > jensen_shannon_divergence(&p, &near));
    }

    #[test]
    fn ks_small_samples_have_no_evidence(
        a in prop::collection::vec(0.0f64..1.0, 0..2),
        b in prop::collection::vec(0.0f64..1.0, 0..20),
    ) {
        let r = ks_two_sample(&a, &b);
        prop_assert_eq!(r.statistic, 0.0);
        prop_assert_eq!(r.pvalue, 1.0);
    }

    #[test]
    fn ks_identical_samples_are_not_significant(a in prop::collection::vec(0.0f64..1.0, 2..40)) {
        let r = ks_two_sample(&a, &a);
        prop_assert_eq!(r.statistic, 0.0);
        prop_assert!(r.pvalue > 0.05);
    }

    #[test]
    fn ks_separated_clusters_are_significant(
        low in prop::collection::vec(0.05f64..0.15, 10..30),
        high in prop::collection::vec(0.85f64..0.95, 10..30),
    ) {
        let r = ks_two_sample(&low, &high);
        prop_assert_eq!(r.statistic, 1.0);
        prop_assert!(r.pvalue < 0.05);
    }

    #[test]
    fn ks_pvalue_in_unit_interval(
        a in prop::collection::vec(0.0f64..1.0, 2..30),
        b in prop::collection::vec(0.0f64..1.0, 2..30),
    ) {
        let r = ks_two_sample(&a, &b);
        prop_assert!((0.0..=1.0).contains(&r.pvalue));
        prop_assert!((0.0..=1.0).contains(&r.statistic));
    }
}
