//! Divergence and hypothesis tests between two snapshot shapes.
//!
//! JSD is in nats (natural log), bounded by ln 2. The KS test is two-sided.

use std::collections::BTreeSet;

use statrs::distribution::{ChiSquared, ContinuousCDF};

use ashwam_core::constants::JSD_EPSILON;

use crate::distribution::{Counts, Distribution};

/// Jensen-Shannon divergence over the union of keys of `p` and `q`.
///
/// Missing keys count as zero; every share is floored at 1e-10 and both
/// sides renormalized before `0.5 * (KL(p||m) + KL(q||m))`.
/// Returns 0.0 when both maps are empty.
pub fn jensen_shannon_divergence(p: &Distribution, q: &Distribution) -> f64 {
    let keys: BTreeSet<&String> = p.keys().chain(q.keys()).collect();
    if keys.is_empty() {
        return 0.0;
    }

    let p: Vec<f64> = keys
        .iter()
        .map(|k| p.get(*k).copied().unwrap_or(0.0).max(JSD_EPSILON))
        .collect();
    let q: Vec<f64> = keys
        .iter()
        .map(|k| q.get(*k).copied().unwrap_or(0.0).max(JSD_EPSILON))
        .collect();
    let p = renormalize(p);
    let q = renormalize(q);
    let m: Vec<f64> = p.iter().zip(&q).map(|(a, b)| 0.5 * (a + b)).collect();

    let js = 0.5 * (kl_divergence(&p, &m) + kl_divergence(&q, &m));
    js.max(0.0)
}

fn renormalize(mut values: Vec<f64>) -> Vec<f64> {
    let sum: f64 = values.iter().sum();
    if sum > 0.0 {
        for v in &mut values {
            *v /= sum;
        }
    }
    values
}

fn kl_divergence(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q)
        .filter(|(a, _)| **a > 0.0)
        .map(|(a, b)| a * (a / b).ln())
        .sum()
}

/// Two-sample Kolmogorov-Smirnov result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsResult {
    /// Largest gap between the two empirical CDFs.
    pub statistic: f64,
    /// Two-sided p-value.
    pub pvalue: f64,
}

impl KsResult {
    const NO_EVIDENCE: KsResult = KsResult {
        statistic: 0.0,
        pvalue: 1.0,
    };
}

/// Two-sided two-sample KS test.
///
/// The p-value uses the asymptotic Kolmogorov distribution with the
/// Stephens correction `lambda = (sqrt(ne) + 0.12 + 0.11 / sqrt(ne)) * D`.
/// Non-finite observations are dropped; fewer than two observations on either
/// side yield `(0.0, 1.0)`.
pub fn ks_two_sample(baseline: &[f64], current: &[f64]) -> KsResult {
    let a = sorted_finite(baseline);
    let b = sorted_finite(current);
    if a.len() < 2 || b.len() < 2 {
        return KsResult::NO_EVIDENCE;
    }

    let statistic = ks_statistic(&a, &b);
    let (n, m) = (a.len() as f64, b.len() as f64);
    let ne = n * m / (n + m);
    let root = ne.sqrt();
    let lambda = (root + 0.12 + 0.11 / root) * statistic;

    KsResult {
        statistic,
        pvalue: kolmogorov_q(lambda),
    }
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    out.sort_by(f64::total_cmp);
    out
}

/// sup |F_a(x) - F_b(x)| for sorted samples, handling ties.
fn ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    let (n, m) = (a.len(), b.len());
    let (mut i, mut j) = (0usize, 0usize);
    let mut d: f64 = 0.0;
    while i < n && j < m {
        let x = a[i].min(b[j]);
        while i < n && a[i] <= x {
            i += 1;
        }
        while j < m && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / n as f64 - j as f64 / m as f64).abs());
    }
    d
}

/// Kolmogorov survival function `Q(lambda) = 2 sum (-1)^(k-1) exp(-2 k^2 lambda^2)`.
/// Returns 1.0 when the series does not settle (lambda near zero).
fn kolmogorov_q(lambda: f64) -> f64 {
    const MAX_TERMS: i32 = 100;
    let a2 = -2.0 * lambda * lambda;
    let mut sign = 2.0;
    let mut sum = 0.0;
    let mut previous = 0.0;

    for k in 1..=MAX_TERMS {
        let kf = f64::from(k);
        let term = sign * (a2 * kf * kf).exp();
        sum += term;
        if term.abs() <= 1e-3 * previous || term.abs() <= 1e-8 * sum {
            return sum.clamp(0.0, 1.0);
        }
        sign = -sign;
        previous = term.abs();
    }
    1.0
}

/// Chi-squared goodness-of-fit result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquaredResult {
    pub statistic: f64,
    pub pvalue: f64,
}

/// Chi-squared goodness of fit of `current` counts against the baseline
/// proportions. Categories with zero expected count are skipped; fewer than
/// two usable categories, or an empty baseline, yield `(0.0, 1.0)`.
pub fn chi_squared_test(baseline: &Counts, current: &Counts) -> ChiSquaredResult {
    const NO_EVIDENCE: ChiSquaredResult = ChiSquaredResult {
        statistic: 0.0,
        pvalue: 1.0,
    };

    let categories: BTreeSet<&String> = baseline.keys().chain(current.keys()).collect();
    let total_expected: u64 = baseline.values().sum();
    let total_observed: u64 = current.values().sum();
    if total_expected == 0 {
        return NO_EVIDENCE;
    }
    let scale = total_observed as f64 / total_expected as f64;

    let pairs: Vec<(f64, f64)> = categories
        .iter()
        .map(|c| {
            let observed = current.get(*c).copied().unwrap_or(0) as f64;
            let expected = baseline.get(*c).copied().unwrap_or(0) as f64 * scale;
            (observed, expected)
        })
        .filter(|(_, e)| *e > 0.0)
        .collect();
    if pairs.len() < 2 {
        return NO_EVIDENCE;
    }

    let statistic: f64 = pairs.iter().map(|(o, e)| (o - e).powi(2) / e).sum();
    let dof = (pairs.len() - 1) as f64;
    let pvalue = match ChiSquared::new(dof) {
        Ok(dist) => dist.sf(statistic).clamp(0.0, 1.0),
        Err(_) => 1.0,
    };

    ChiSquaredResult { statistic, pvalue }
}
