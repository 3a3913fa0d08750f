use serde::{Deserialize, Serialize};

use super::defaults;

/// When to flag drift vs breakage.
///
/// JS divergence thresholds are in nats (natural log), so the ceiling is ln 2.
/// Percentage thresholds are percentage points (15.0 == 15pp).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftThresholds {
    pub js_drift: f64,
    pub js_breakage: f64,
    /// Two-sided KS p-value below this is DRIFT.
    pub ks_alpha: f64,
    /// Two-sided KS p-value below this is BREAKAGE.
    pub ks_breakage_alpha: f64,
    /// Mind/emotion share increase that raises a surge warning.
    pub domain_shift_pct: f64,
    /// Per-bucket arousal share movement that raises a shift warning.
    pub arousal_shift_pct: f64,
    pub volume_change_pct: f64,
    pub volume_breakage_pct: f64,
    /// Uncertainty increase (pp) that counts as DRIFT.
    pub uncertainty_shift_pct: f64,
    /// Absolute uncertainty rate that counts as BREAKAGE regardless of baseline.
    pub uncertainty_breakage_rate: f64,
    /// Current "high" arousal share above which a collapse is considered.
    pub arousal_collapse_high: f64,
    /// Baseline "high" arousal share below which a collapse is considered.
    pub arousal_collapse_baseline: f64,
}

impl Default for DriftThresholds {
    fn default() -> Self {
        Self {
            js_drift: defaults::DEFAULT_JS_DRIFT,
            js_breakage: defaults::DEFAULT_JS_BREAKAGE,
            ks_alpha: defaults::DEFAULT_KS_ALPHA,
            ks_breakage_alpha: defaults::DEFAULT_KS_BREAKAGE_ALPHA,
            domain_shift_pct: defaults::DEFAULT_DOMAIN_SHIFT_PCT,
            arousal_shift_pct: defaults::DEFAULT_AROUSAL_SHIFT_PCT,
            volume_change_pct: defaults::DEFAULT_VOLUME_CHANGE_PCT,
            volume_breakage_pct: defaults::DEFAULT_VOLUME_BREAKAGE_PCT,
            uncertainty_shift_pct: defaults::DEFAULT_UNCERTAINTY_SHIFT_PCT,
            uncertainty_breakage_rate: defaults::DEFAULT_UNCERTAINTY_BREAKAGE_RATE,
            arousal_collapse_high: defaults::DEFAULT_AROUSAL_COLLAPSE_HIGH,
            arousal_collapse_baseline: defaults::DEFAULT_AROUSAL_COLLAPSE_BASELINE,
        }
    }
}
