//! Drift policy: metric values to statuses, shape changes to alerts.

use std::collections::BTreeSet;

use ashwam_core::config::DriftThresholds;
use ashwam_core::models::{Alert, Domain, DriftStatus};

use crate::distribution::Distribution;

/// Status of a categorical metric from its JS divergence.
pub fn distribution_status(js: f64, t: &DriftThresholds) -> DriftStatus {
    if js >= t.js_breakage {
        DriftStatus::Breakage
    } else if js >= t.js_drift {
        DriftStatus::Drift
    } else {
        DriftStatus::Stable
    }
}

/// Status of the items-per-journal mean from its relative change, in percent.
pub fn volume_status(change_pct: f64, t: &DriftThresholds) -> DriftStatus {
    let magnitude = change_pct.abs();
    if magnitude > t.volume_breakage_pct {
        DriftStatus::Breakage
    } else if magnitude > t.volume_change_pct {
        DriftStatus::Drift
    } else {
        DriftStatus::Stable
    }
}

/// Status of the uncertainty rate. `increase_pp` is the percentage-point rise.
pub fn uncertainty_status(current_rate: f64, increase_pp: f64, t: &DriftThresholds) -> DriftStatus {
    if current_rate > t.uncertainty_breakage_rate {
        DriftStatus::Breakage
    } else if increase_pp > t.uncertainty_shift_pct {
        DriftStatus::Drift
    } else {
        DriftStatus::Stable
    }
}

/// Status of the confidence distribution from the KS p-value.
pub fn confidence_status(pvalue: f64, t: &DriftThresholds) -> DriftStatus {
    if pvalue < t.ks_breakage_alpha {
        DriftStatus::Breakage
    } else if pvalue < t.ks_alpha {
        DriftStatus::Drift
    } else {
        DriftStatus::Stable
    }
}

/// Mind and emotion shares rising by more than `domain_shift_pct` points.
pub fn domain_surge_alerts(
    baseline: &Distribution,
    current: &Distribution,
    t: &DriftThresholds,
) -> Vec<Alert> {
    [Domain::Mind, Domain::Emotion]
        .iter()
        .filter_map(|domain| {
            let before = share(baseline, domain.as_str());
            let after = share(current, domain.as_str());
            let shift = (after - before) * 100.0;
            (shift > t.domain_shift_pct).then(|| {
                Alert::warning(format!(
                    "{domain} domain surged {shift:+.1}% (was {:.1}%, now {:.1}%)",
                    before * 100.0,
                    after * 100.0
                ))
            })
        })
        .collect()
}

/// Arousal collapse onto "high", plus any bucket moving more than
/// `arousal_shift_pct` points.
pub fn arousal_alerts(
    baseline: &Distribution,
    current: &Distribution,
    t: &DriftThresholds,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    let high_now = share(current, "high");
    if high_now > t.arousal_collapse_high && share(baseline, "high") < t.arousal_collapse_baseline {
        alerts.push(Alert::critical(format!(
            "arousal collapsed to {:.0}% high",
            high_now * 100.0
        )));
    }

    let buckets: BTreeSet<&String> = baseline.keys().chain(current.keys()).collect();
    for bucket in buckets {
        let before = share(baseline, bucket);
        let after = share(current, bucket);
        let shift = (after - before) * 100.0;
        if shift.abs() > t.arousal_shift_pct {
            alerts.push(Alert::warning(format!(
                "arousal bucket '{bucket}' shifted {shift:+.1} points (was {:.1}%, now {:.1}%)",
                before * 100.0,
                after * 100.0
            )));
        }
    }

    alerts
}

fn share(dist: &Distribution, key: &str) -> f64 {
    dist.get(key).copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(pairs: &[(&str, f64)]) -> Distribution {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn js_boundaries_are_inclusive() {
        let t = DriftThresholds::default();
        assert_eq!(distribution_status(0.0999, &t), DriftStatus::Stable);
        assert_eq!(distribution_status(0.10, &t), DriftStatus::Drift);
        assert_eq!(distribution_status(0.20, &t), DriftStatus::Breakage);
    }

    #[test]
    fn volume_boundaries_are_exclusive() {
        let t = DriftThresholds::default();
        assert_eq!(volume_status(25.0, &t), DriftStatus::Stable);
        assert_eq!(volume_status(-25.1, &t), DriftStatus::Drift);
        assert_eq!(volume_status(50.0, &t), DriftStatus::Drift);
        assert_eq!(volume_status(-60.0, &t), DriftStatus::Breakage);
    }

    #[test]
    fn uncertainty_breakage_wins_over_drift() {
        let t = DriftThresholds::default();
        assert_eq!(uncertainty_status(0.65, 40.0, &t), DriftStatus::Breakage);
        assert_eq!(uncertainty_status(0.40, 20.0, &t), DriftStatus::Drift);
        assert_eq!(uncertainty_status(0.40, -20.0, &t), DriftStatus::Stable);
    }

    #[test]
    fn ks_alpha_tiers() {
        let t = DriftThresholds::default();
        assert_eq!(confidence_status(0.005, &t), DriftStatus::Breakage);
        assert_eq!(confidence_status(0.03, &t), DriftStatus::Drift);
        assert_eq!(confidence_status(0.05, &t), DriftStatus::Stable);
    }

    #[test]
    fn mind_surge_is_flagged() {
        let t = DriftThresholds::default();
        let base = dist(&[("mind", 0.10), ("food", 0.90)]);
        let curr = dist(&[("mind", 0.40), ("food", 0.60)]);
        let alerts = domain_surge_alerts(&base, &curr, &t);
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.starts_with("mind domain surged +30.0%"));
    }

    #[test]
    fn collapse_requires_healthy_baseline() {
        let t = DriftThresholds::default();
        let base = dist(&[("high", 0.80), ("low", 0.20)]);
        let curr = dist(&[("high", 0.95), ("low", 0.05)]);
        assert!(arousal_alerts(&base, &curr, &t).iter().all(|a| !a.is_critical()));
    }
}
