use ashwam_analytics::confidence::{classify, wilson_interval, Bound, Significance};
use proptest::prelude::*;

proptest! {
    #[test]
    fn interval_contains_rate(rate in 0.0f64..=1.0, n in 1usize..5000) {
        let ci = wilson_interval(rate, n, 0.95);
        prop_assert!(ci.lower >= 0.0);
        prop_assert!(ci.upper <= 1.0);
        prop_assert!(ci.lower <= rate && rate <= ci.upper, "{ci:?} vs {rate}");
    }

    #[test]
    fn interval_narrows_with_more_data(rate in 0.05f64..0.95, n in 10usize..1000) {
        let small = wilson_interval(rate, n, 0.95);
        let large = wilson_interval(rate, n * 4, 0.95);
        prop_assert!(large.margin < small.margin);
    }

    #[test]
    fn higher_level_is_wider(rate in 0.05f64..0.95, n in 10usize..1000) {
        let ninety = wilson_interval(rate, n, 0.90);
        let ninety_nine = wilson_interval(rate, n, 0.99);
        prop_assert!(ninety_nine.margin > ninety.margin);
    }

    #[test]
    fn rate_far_below_ceiling_is_within_limit(n in 200usize..2000) {
        let ci = wilson_interval(0.0, n, 0.95);
        prop_assert_eq!(classify(&ci, Bound::Ceiling(0.05)), Significance::WithinLimit);
    }
}
