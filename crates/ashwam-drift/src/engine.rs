//! DriftEngine: baseline vs current, one metric per shape dimension.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use ashwam_core::config::DriftThresholds;
use ashwam_core::models::{
    generate_run_id, Alert, DriftMetric, DriftReport, DriftStatus, ExtractionSnapshot, MetricName,
};

use crate::distribution::{self, Distribution, VolumeStats};
use crate::policy;
use crate::statistics::{chi_squared_test, jensen_shannon_divergence, ks_two_sample};

/// What a healthy value of each metric looks like, for report readers.
pub fn normal_definitions() -> BTreeMap<MetricName, String> {
    [
        (MetricName::ExtractionVolume, "1-2 items per journal, fewer than 10% of journals empty"),
        (MetricName::UncertaintyRate, "under 40% of items hedged (unknown bucket or low confidence)"),
        (MetricName::DomainMix, "symptom 30-40%, food 20-30%, emotion 20-30%, mind 10-20%"),
        (MetricName::ArousalDistribution, "low 30-40%, medium 30-40%, high 20-30%"),
        (MetricName::IntensityDistribution, "low 20-30%, medium 40-50%, high 20-30%"),
        (MetricName::ConfidenceDistribution, "mean above 0.6, spread below 0.2"),
    ]
    .into_iter()
    .map(|(name, text)| (name, text.to_string()))
    .collect()
}

/// Compares two snapshot sets. Holds only its thresholds.
#[derive(Debug, Clone, Default)]
pub struct DriftEngine {
    thresholds: DriftThresholds,
}

impl DriftEngine {
    pub fn new(thresholds: DriftThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &DriftThresholds {
        &self.thresholds
    }

    pub fn compare(
        &self,
        baseline: &[ExtractionSnapshot],
        current: &[ExtractionSnapshot],
        baseline_source: &str,
        current_source: &str,
    ) -> DriftReport {
        self.compare_at(baseline, current, baseline_source, current_source, Utc::now())
    }

    /// [`compare`](Self::compare) with an explicit timestamp.
    pub fn compare_at(
        &self,
        baseline: &[ExtractionSnapshot],
        current: &[ExtractionSnapshot],
        baseline_source: &str,
        current_source: &str,
        now: DateTime<Utc>,
    ) -> DriftReport {
        let run_id = generate_run_id("drift", now);
        let span = ashwam_core::drift_span!(run_id, baseline.len(), current.len());
        let _guard = span.enter();

        let t = &self.thresholds;
        let base_items = distribution::all_items(baseline);
        let curr_items = distribution::all_items(current);

        let mut metrics = Vec::with_capacity(6);
        let mut alerts = Vec::new();

        // Volume
        let base_vol = VolumeStats::from_snapshots(baseline);
        let curr_vol = VolumeStats::from_snapshots(current);
        let vol_change = relative_change_pct(base_vol.mean, curr_vol.mean);
        let vol_status = policy::volume_status(vol_change, t);
        metrics.push(scalar_metric(
            MetricName::ExtractionVolume,
            base_vol.mean,
            curr_vol.mean,
            vol_change,
            vol_status,
        ));
        if vol_status != DriftStatus::Stable {
            alerts.push(Alert::warning(format!(
                "extraction volume changed {vol_change:+.1}%"
            )));
        }

        // Uncertainty
        let base_unc = distribution::uncertainty_rate(&base_items);
        let curr_unc = distribution::uncertainty_rate(&curr_items);
        let unc_change = (curr_unc - base_unc) * 100.0;
        metrics.push(scalar_metric(
            MetricName::UncertaintyRate,
            base_unc,
            curr_unc,
            unc_change,
            policy::uncertainty_status(curr_unc, unc_change, t),
        ));

        // Domain mix
        let base_domain_counts = distribution::domain_counts(&base_items);
        let curr_domain_counts = distribution::domain_counts(&curr_items);
        let base_domain = distribution::normalize(&base_domain_counts);
        let curr_domain = distribution::normalize(&curr_domain_counts);
        let mut domain_metric = self.categorical_metric(MetricName::DomainMix, &base_domain, &curr_domain);
        domain_metric.chi_squared_pvalue =
            Some(chi_squared_test(&base_domain_counts, &curr_domain_counts).pvalue);
        alerts.extend(policy::domain_surge_alerts(&base_domain, &curr_domain, t));

        // Arousal
        let base_arousal = distribution::arousal_distribution(&base_items);
        let curr_arousal = distribution::arousal_distribution(&curr_items);
        let arousal_metric =
            self.categorical_metric(MetricName::ArousalDistribution, &base_arousal, &curr_arousal);
        alerts.extend(policy::arousal_alerts(&base_arousal, &curr_arousal, t));

        // Intensity
        let intensity_metric = self.categorical_metric(
            MetricName::IntensityDistribution,
            &distribution::intensity_distribution(&base_items),
            &distribution::intensity_distribution(&curr_items),
        );

        // Confidence
        let base_conf = distribution::confidence_samples(&base_items);
        let curr_conf = distribution::confidence_samples(&curr_items);
        let ks = ks_two_sample(&base_conf, &curr_conf);
        let conf_status = policy::confidence_status(ks.pvalue, t);
        let base_mean = distribution::mean(&base_conf);
        let curr_mean = distribution::mean(&curr_conf);
        let confidence_metric = DriftMetric {
            name: MetricName::ConfidenceDistribution,
            baseline_value: base_mean,
            current_value: curr_mean,
            change_pct: relative_change_pct(base_mean, curr_mean),
            js_divergence: None,
            ks_statistic: Some(ks.statistic),
            ks_pvalue: Some(ks.pvalue),
            chi_squared_pvalue: None,
            status: conf_status,
        };

        if domain_metric.status == DriftStatus::Breakage {
            alerts.push(Alert::critical("significant domain distribution shift detected"));
        }
        if arousal_metric.status == DriftStatus::Breakage {
            alerts.push(Alert::critical("significant arousal distribution shift detected"));
        }
        if conf_status != DriftStatus::Stable {
            alerts.push(Alert::warning(format!(
                "confidence distribution shifted (KS p={:.4})",
                ks.pvalue
            )));
        }

        metrics.extend([domain_metric, arousal_metric, intensity_metric, confidence_metric]);

        for metric in metrics.iter().filter(|m| m.status != DriftStatus::Stable) {
            tracing::warn!(
                metric = %metric.name,
                status = %metric.status,
                baseline = metric.baseline_value,
                current = metric.current_value,
                "drift detected"
            );
        }
        tracing::info!(
            baseline_items = base_items.len(),
            current_items = curr_items.len(),
            alerts = alerts.len(),
            "drift comparison complete"
        );

        DriftReport {
            run_id,
            timestamp: now,
            baseline_source: baseline_source.to_string(),
            current_source: current_source.to_string(),
            metrics,
            alerts,
            thresholds: *t,
            normal_definitions: normal_definitions(),
        }
    }

    /// JSD-scored metric. Display values are the largest share on each side.
    fn categorical_metric(
        &self,
        name: MetricName,
        baseline: &Distribution,
        current: &Distribution,
    ) -> DriftMetric {
        let js = jensen_shannon_divergence(baseline, current);
        let base_top = largest_share(baseline);
        let curr_top = largest_share(current);
        DriftMetric {
            name,
            baseline_value: base_top,
            current_value: curr_top,
            change_pct: relative_change_pct(base_top, curr_top),
            js_divergence: Some(js),
            ks_statistic: None,
            ks_pvalue: None,
            chi_squared_pvalue: None,
            status: policy::distribution_status(js, &self.thresholds),
        }
    }
}

fn scalar_metric(
    name: MetricName,
    baseline_value: f64,
    current_value: f64,
    change_pct: f64,
    status: DriftStatus,
) -> DriftMetric {
    DriftMetric {
        name,
        baseline_value,
        current_value,
        change_pct,
        js_divergence: None,
        ks_statistic: None,
        ks_pvalue: None,
        chi_squared_pvalue: None,
        status,
    }
}

/// Percent change relative to `baseline`; 0 when the baseline is not positive.
fn relative_change_pct(baseline: f64, current: f64) -> f64 {
    if baseline > 0.0 {
        (current - baseline) / baseline * 100.0
    } else {
        0.0
    }
}

fn largest_share(dist: &Distribution) -> f64 {
    dist.values().copied().fold(0.0, f64::max)
}
