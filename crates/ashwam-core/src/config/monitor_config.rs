//! Top-level monitor configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{CanaryThresholds, DriftThresholds, HumanReviewConfig, InvariantThresholds};
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all threshold sections.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`ASHWAM_*`)
/// 3. Config file (`--config` path, else `ashwam.toml` in the data directory)
/// 4. Compiled defaults
///
/// Every engine entry point takes this value (or one of its sections)
/// explicitly; there is no process-wide instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    pub invariants: InvariantThresholds,
    pub drift: DriftThresholds,
    pub canary: CanaryThresholds,
    pub human_review: HumanReviewConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_daily_reviews: Option<usize>,
    pub escalation_timeout_hours: Option<u64>,
    pub max_hallucination_rate: Option<f64>,
}

impl MonitorConfig {
    /// Load configuration with layered resolution.
    ///
    /// `explicit_path` must exist when given. Otherwise `ashwam.toml` in
    /// `data_dir` is used if present.
    pub fn load(
        data_dir: &Path,
        explicit_path: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let file_path: Option<PathBuf> = match explicit_path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: p.display().to_string(),
                    });
                }
                Some(p.to_path_buf())
            }
            None => {
                let candidate = data_dir.join(PROJECT_CONFIG_FILE);
                candidate.exists().then_some(candidate)
            }
        };

        let mut config = match file_path {
            Some(ref path) => Self::from_file(path)?,
            None => Self::default(),
        };

        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok());

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        config.validate()?;
        tracing::debug!(source = ?file_path, "configuration resolved");
        Ok(config)
    }

    /// Load configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::ReadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            },
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rates = [
            ("invariants.min_schema_validity", self.invariants.min_schema_validity),
            ("invariants.min_evidence_validity", self.invariants.min_evidence_validity),
            ("invariants.max_hallucination_rate", self.invariants.max_hallucination_rate),
            ("invariants.max_contradiction_rate", self.invariants.max_contradiction_rate),
            ("drift.ks_alpha", self.drift.ks_alpha),
            ("drift.ks_breakage_alpha", self.drift.ks_breakage_alpha),
            ("drift.uncertainty_breakage_rate", self.drift.uncertainty_breakage_rate),
            ("drift.arousal_collapse_high", self.drift.arousal_collapse_high),
            ("drift.arousal_collapse_baseline", self.drift.arousal_collapse_baseline),
            ("canary.f1_pass", self.canary.f1_pass),
            ("canary.f1_alert", self.canary.f1_alert),
            ("canary.f1_human_review", self.canary.f1_human_review),
            ("canary.f1_rollback", self.canary.f1_rollback),
            ("canary.min_evidence_match", self.canary.min_evidence_match),
        ];
        for (field, value) in rates {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }

        if !(self.drift.js_drift >= 0.0 && self.drift.js_drift < self.drift.js_breakage) {
            return Err(ConfigError::ValidationFailed {
                field: "drift.js_drift".to_string(),
                message: "must be non-negative and below drift.js_breakage".to_string(),
            });
        }
        if self.drift.ks_breakage_alpha > self.drift.ks_alpha {
            return Err(ConfigError::ValidationFailed {
                field: "drift.ks_breakage_alpha".to_string(),
                message: "must not exceed drift.ks_alpha".to_string(),
            });
        }
        if self.drift.volume_change_pct > self.drift.volume_breakage_pct {
            return Err(ConfigError::ValidationFailed {
                field: "drift.volume_change_pct".to_string(),
                message: "must not exceed drift.volume_breakage_pct".to_string(),
            });
        }
        for (field, value) in [
            ("drift.domain_shift_pct", self.drift.domain_shift_pct),
            ("drift.arousal_shift_pct", self.drift.arousal_shift_pct),
            ("drift.uncertainty_shift_pct", self.drift.uncertainty_shift_pct),
            ("drift.volume_change_pct", self.drift.volume_change_pct),
        ] {
            if value < 0.0 {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be non-negative".to_string(),
                });
            }
        }

        let c = &self.canary;
        if !(c.f1_pass >= c.f1_alert && c.f1_alert >= c.f1_human_review && c.f1_human_review >= c.f1_rollback) {
            return Err(ConfigError::ValidationFailed {
                field: "canary".to_string(),
                message: "F1 tiers must be descending: pass >= alert >= human_review >= rollback"
                    .to_string(),
            });
        }

        let r = &self.human_review;
        if r.max_daily_reviews == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "human_review.max_daily_reviews".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        for (field, value) in [
            ("human_review.critical_weight", r.critical_weight),
            ("human_review.warning_weight", r.warning_weight),
            ("human_review.info_weight", r.info_weight),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be non-negative".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Apply environment variable overrides through `lookup`.
    /// Pattern: `ASHWAM_JS_DRIFT`, `ASHWAM_MAX_DAILY_REVIEWS`, etc.
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_overrides<F>(config: &mut MonitorConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
            let raw = raw?;
            match raw.parse::<T>() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(key, value = %raw, "ignoring unparseable environment override");
                    None
                }
            }
        }

        if let Some(v) = parse("ASHWAM_MIN_SCHEMA_VALIDITY", lookup("ASHWAM_MIN_SCHEMA_VALIDITY")) {
            config.invariants.min_schema_validity = v;
        }
        if let Some(v) = parse("ASHWAM_MAX_HALLUCINATION_RATE", lookup("ASHWAM_MAX_HALLUCINATION_RATE")) {
            config.invariants.max_hallucination_rate = v;
        }
        if let Some(v) = parse("ASHWAM_MAX_CONTRADICTION_RATE", lookup("ASHWAM_MAX_CONTRADICTION_RATE")) {
            config.invariants.max_contradiction_rate = v;
        }
        if let Some(v) = parse("ASHWAM_JS_DRIFT", lookup("ASHWAM_JS_DRIFT")) {
            config.drift.js_drift = v;
        }
        if let Some(v) = parse("ASHWAM_JS_BREAKAGE", lookup("ASHWAM_JS_BREAKAGE")) {
            config.drift.js_breakage = v;
        }
        if let Some(v) = parse("ASHWAM_F1_PASS", lookup("ASHWAM_F1_PASS")) {
            config.canary.f1_pass = v;
        }
        if let Some(v) = parse("ASHWAM_MIN_EVIDENCE_MATCH", lookup("ASHWAM_MIN_EVIDENCE_MATCH")) {
            config.canary.min_evidence_match = v;
        }
        if let Some(v) = parse("ASHWAM_MAX_DAILY_REVIEWS", lookup("ASHWAM_MAX_DAILY_REVIEWS")) {
            config.human_review.max_daily_reviews = v;
        }
        if let Some(v) = parse(
            "ASHWAM_ESCALATION_TIMEOUT_HOURS",
            lookup("ASHWAM_ESCALATION_TIMEOUT_HOURS"),
        ) {
            config.human_review.escalation_timeout_hours = v;
        }
    }

    /// Apply CLI overrides (highest priority).
    pub fn apply_cli_overrides(config: &mut MonitorConfig, cli: &CliOverrides) {
        if let Some(v) = cli.max_daily_reviews {
            config.human_review.max_daily_reviews = v;
        }
        if let Some(v) = cli.escalation_timeout_hours {
            config.human_review.escalation_timeout_hours = v;
        }
        if let Some(v) = cli.max_hallucination_rate {
            config.invariants.max_hallucination_rate = v;
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
