//! Wilson score intervals for the invariant rates.
//!
//! For a rate p observed over n items at confidence level L:
//!   z      = Φ⁻¹(1 − (1 − L) / 2)
//!   denom  = 1 + z²/n
//!   center = (p + z²/2n) / denom
//!   margin = z · sqrt(p(1 − p)/n + z²/4n²) / denom
//!
//! The interval is clamped to [0, 1] and always contains p.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use ashwam_core::models::InvariantReport;

const FALLBACK_Z: f64 = 1.959_963_984_540_054;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WilsonInterval {
    pub lower: f64,
    pub upper: f64,
    pub margin: f64,
}

impl WilsonInterval {
    pub const EMPTY: WilsonInterval = WilsonInterval {
        lower: 0.0,
        upper: 0.0,
        margin: 0.0,
    };

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Two-sided critical value for `level`. Levels outside (0, 1) use 95%.
pub fn z_score(level: f64) -> f64 {
    if !(level > 0.0 && level < 1.0) {
        tracing::warn!(level, "confidence level outside (0, 1), using 0.95");
        return FALLBACK_Z;
    }
    match Normal::new(0.0, 1.0) {
        Ok(normal) => {
            let z = normal.inverse_cdf(1.0 - (1.0 - level) / 2.0);
            if z.is_finite() {
                z
            } else {
                FALLBACK_Z
            }
        }
        Err(_) => FALLBACK_Z,
    }
}

/// Wilson interval for `rate` observed over `n` items.
pub fn wilson_interval(rate: f64, n: usize, level: f64) -> WilsonInterval {
    if n == 0 {
        return WilsonInterval::EMPTY;
    }
    let p = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
    let n = n as f64;
    let z = z_score(level);
    let z2 = z * z;

    let denom = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denom;
    let margin = z * ((p * (1.0 - p) / n) + z2 / (4.0 * n * n)).sqrt() / denom;

    WilsonInterval {
        lower: (center - margin).min(p).max(0.0),
        upper: (center + margin).max(p).min(1.0),
        margin,
    }
}

/// Which side of a threshold a rate must stay on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Bound {
    /// The rate must stay at or below this value.
    Ceiling(f64),
    /// The rate must stay at or above this value.
    Floor(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Significance {
    /// The whole interval is on the wrong side of the threshold.
    Significant,
    /// The interval straddles the threshold.
    Ambiguous,
    WithinLimit,
}

impl Significance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Significant => "SIGNIFICANT",
            Self::Ambiguous => "AMBIGUOUS",
            Self::WithinLimit => "WITHIN_LIMIT",
        }
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify(interval: &WilsonInterval, bound: Bound) -> Significance {
    match bound {
        Bound::Ceiling(t) if interval.lower > t => Significance::Significant,
        Bound::Ceiling(t) if interval.upper > t => Significance::Ambiguous,
        Bound::Floor(t) if interval.upper < t => Significance::Significant,
        Bound::Floor(t) if interval.lower < t => Significance::Ambiguous,
        _ => Significance::WithinLimit,
    }
}

/// One rate with its interval and verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEstimate {
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub margin_of_error: f64,
    pub bound: Bound,
    pub significance: Significance,
    /// e.g. `12.5% ± 4.1%`
    pub display: String,
}

impl RateEstimate {
    fn new(rate: f64, n: usize, level: f64, bound: Bound) -> Self {
        let interval = wilson_interval(rate, n, level);
        Self {
            point_estimate: rate,
            lower_bound: interval.lower,
            upper_bound: interval.upper,
            margin_of_error: interval.margin,
            bound,
            significance: classify(&interval, bound),
            display: format!("{:.1}% ± {:.1}%", rate * 100.0, interval.margin * 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceReport {
    pub run_id: String,
    pub sample_size: usize,
    pub confidence_level: f64,
    pub metrics: BTreeMap<String, RateEstimate>,
    pub interpretation: String,
}

impl ConfidenceReport {
    pub fn metric(&self, name: &str) -> Option<&RateEstimate> {
        self.metrics.get(name)
    }
}

/// Intervals for the four invariant rates, each judged against its
/// configured threshold. The sample size is the item count of the run.
pub fn confidence_report(report: &InvariantReport, level: f64) -> ConfidenceReport {
    let n = report.total_items;
    let t = &report.thresholds;

    let hallucination = RateEstimate::new(
        report.hallucination_rate,
        n,
        level,
        Bound::Ceiling(t.max_hallucination_rate),
    );
    let interpretation = interpret(&hallucination, t.max_hallucination_rate, level);

    let mut metrics = BTreeMap::new();
    metrics.insert("hallucination_rate".to_string(), hallucination);
    metrics.insert(
        "contradiction_rate".to_string(),
        RateEstimate::new(
            report.contradiction_rate,
            n,
            level,
            Bound::Ceiling(t.max_contradiction_rate),
        ),
    );
    metrics.insert(
        "evidence_validity_rate".to_string(),
        RateEstimate::new(
            report.evidence_validity_rate,
            n,
            level,
            Bound::Floor(t.min_evidence_validity),
        ),
    );
    metrics.insert(
        "schema_validity_rate".to_string(),
        RateEstimate::new(
            report.schema_validity_rate,
            n,
            level,
            Bound::Floor(t.min_schema_validity),
        ),
    );

    ConfidenceReport {
        run_id: report.run_id.clone(),
        sample_size: n,
        confidence_level: level,
        metrics,
        interpretation,
    }
}

fn interpret(hallucination: &RateEstimate, threshold: f64, level: f64) -> String {
    let rate = hallucination.point_estimate * 100.0;
    let level = level * 100.0;
    let threshold = threshold * 100.0;
    match hallucination.significance {
        Significance::Significant => format!(
            "Statistically significant: hallucination rate {rate:.1}% exceeds the {threshold:.1}% threshold \
             even at the lower {level:.0}% bound ({:.1}%)",
            hallucination.lower_bound * 100.0
        ),
        Significance::Ambiguous => format!(
            "Uncertain: hallucination rate {rate:.1}% may or may not exceed the {threshold:.1}% threshold; \
             the {level:.0}% interval [{:.1}%, {:.1}%] spans it",
            hallucination.lower_bound * 100.0,
            hallucination.upper_bound * 100.0
        ),
        Significance::WithinLimit => format!(
            "Below threshold: hallucination rate {rate:.1}% is below the {threshold:.1}% threshold \
             with {level:.0}% confidence"
        ),
    }
}
