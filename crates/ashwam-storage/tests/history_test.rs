//! Run history persistence tests: save, recent, trend, alert summary, reopen.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};

use ashwam_core::config::{CanaryThresholds, DriftThresholds, InvariantThresholds};
use ashwam_core::models::*;
use ashwam_storage::connection::pragmas::verify_wal_mode;
use ashwam_storage::migrations::{current_version, LATEST_VERSION};
use ashwam_storage::{RunHistory, TrendMetric};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 10, 8, 0, 0).unwrap()
}

fn make_invariant(run_id: &str, hallucination_rate: f64, alerts: Vec<Alert>) -> InvariantReport {
    InvariantReport {
        run_id: run_id.to_string(),
        timestamp: t0(),
        total_items: 40,
        total_journals: 20,
        schema_validity_rate: 1.0,
        evidence_validity_rate: 1.0 - hallucination_rate,
        hallucination_rate,
        contradiction_rate: 0.0,
        violations: Vec::new(),
        alerts,
        thresholds: InvariantThresholds::default(),
        definitions: Vec::new(),
    }
}

fn make_drift(volume: f64, alerts: Vec<Alert>) -> DriftReport {
    let metric = |name, value| DriftMetric {
        name,
        baseline_value: value,
        current_value: value,
        change_pct: 0.0,
        js_divergence: None,
        ks_statistic: None,
        ks_pvalue: None,
        chi_squared_pvalue: None,
        status: DriftStatus::Stable,
    };
    DriftReport {
        run_id: "drift-test".into(),
        timestamp: t0(),
        baseline_source: "day0".into(),
        current_source: "day1".into(),
        metrics: vec![
            metric(MetricName::ExtractionVolume, volume),
            metric(MetricName::UncertaintyRate, 0.2),
        ],
        alerts,
        thresholds: DriftThresholds::default(),
        normal_definitions: BTreeMap::new(),
    }
}

fn make_canary(f1: f64, action: CanaryAction) -> CanaryReport {
    CanaryReport {
        run_id: "canary-test".into(),
        timestamp: t0(),
        precision: f1,
        recall: f1,
        f1,
        evidence_match_rate: 1.0,
        matched_count: 8,
        missed_count: 2,
        extra_count: 2,
        action,
        action_reason: "test".into(),
        per_journal: Vec::new(),
        thresholds: CanaryThresholds::default(),
    }
}

// ─── Schema ───

#[test]
fn migrations_reach_latest_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");
    let _history = RunHistory::open(&path).unwrap();

    let conn = rusqlite::Connection::open(&path).unwrap();
    assert_eq!(current_version(&conn).unwrap(), LATEST_VERSION);
    assert!(verify_wal_mode(&conn).unwrap());
}

#[test]
fn open_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out").join("history.db");
    let history = RunHistory::open(&path).unwrap();
    assert_eq!(history.path(), Some(path.as_path()));
    assert!(path.exists());
}

// ─── Save and read back ───

#[test]
fn save_and_list_recent_runs() {
    let history = RunHistory::open_in_memory().unwrap();
    let inv = make_invariant(
        "inv-1",
        0.125,
        vec![Alert::critical("hallucination rate 12.5% exceeds threshold 5%")],
    );
    let drift = make_drift(1.8, vec![Alert::warning("extraction volume changed +12.0%")]);
    let canary = make_canary(0.75, CanaryAction::Alert);

    let id = history
        .save_run_at(&inv, Some(&drift), Some(&canary), "data/day1", t0())
        .unwrap();
    assert_eq!(id, "inv-1");

    let runs = history.recent_runs(10).unwrap();
    assert_eq!(runs.len(), 1);
    let run = &runs[0];
    assert_eq!(run.timestamp, t0());
    assert_eq!(run.data_source, "data/day1");
    assert_eq!(run.hallucination_rate, 0.125);
    assert_eq!(run.extraction_volume, Some(1.8));
    assert_eq!(run.uncertainty_rate, Some(0.2));
    assert_eq!(run.canary_f1, Some(0.75));
    assert_eq!(run.canary_action.as_deref(), Some("ALERT"));
    assert_eq!(run.alert_count, 2);
    assert_eq!(run.critical_count, 1);
}

#[test]
fn invariant_only_run_leaves_optional_columns_empty() {
    let history = RunHistory::open_in_memory().unwrap();
    history
        .save_run_at(&make_invariant("inv-1", 0.0, Vec::new()), None, None, "", t0())
        .unwrap();

    let run = &history.recent_runs(1).unwrap()[0];
    assert_eq!(run.extraction_volume, None);
    assert_eq!(run.canary_f1, None);
    assert_eq!(run.canary_action, None);
    assert_eq!(run.alert_count, 0);
}

#[test]
fn recent_runs_newest_first_and_limited() {
    let history = RunHistory::open_in_memory().unwrap();
    for i in 0..5 {
        let inv = make_invariant(&format!("inv-{i}"), 0.0, Vec::new());
        history
            .save_run_at(&inv, None, None, "", t0() + Duration::hours(i))
            .unwrap();
    }
    let ids: Vec<String> = history
        .recent_runs(3)
        .unwrap()
        .into_iter()
        .map(|r| r.run_id)
        .collect();
    assert_eq!(ids, vec!["inv-4", "inv-3", "inv-2"]);
}

#[test]
fn saving_same_run_twice_replaces_it() {
    let history = RunHistory::open_in_memory().unwrap();
    let first = make_invariant("inv-1", 0.1, vec![Alert::critical("a"), Alert::critical("b")]);
    let second = make_invariant("inv-1", 0.0, vec![Alert::warning("c")]);

    history.save_run_at(&first, None, None, "", t0()).unwrap();
    history.save_run_at(&second, None, None, "", t0()).unwrap();

    assert_eq!(history.run_count().unwrap(), 1);
    assert_eq!(history.alert_count("inv-1").unwrap(), 1);
    assert_eq!(history.recent_runs(1).unwrap()[0].hallucination_rate, 0.0);
}

#[test]
fn full_reports_round_trip() {
    let history = RunHistory::open_in_memory().unwrap();
    let inv = make_invariant("inv-1", 0.05, Vec::new());
    let canary = make_canary(0.9, CanaryAction::Pass);
    history.save_run_at(&inv, None, Some(&canary), "", t0()).unwrap();

    let stored = history.load_reports("inv-1").unwrap().unwrap();
    assert_eq!(stored.invariant, inv);
    assert_eq!(stored.drift, None);
    assert_eq!(stored.canary, Some(canary));
    assert!(history.load_reports("missing").unwrap().is_none());
}

// ─── Trends ───

#[test]
fn trend_covers_requested_window_oldest_first() {
    let history = RunHistory::open_in_memory().unwrap();
    for (day, rate) in [(0, 0.01), (3, 0.02), (9, 0.08)] {
        let inv = make_invariant(&format!("inv-{day}"), rate, Vec::new());
        history
            .save_run_at(&inv, None, None, "", t0() + Duration::days(day))
            .unwrap();
    }

    let now = t0() + Duration::days(10);
    let points = history
        .trend_at(TrendMetric::HallucinationRate, 7, now)
        .unwrap();
    let values: Vec<Option<f64>> = points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![Some(0.02), Some(0.08)]);
    assert_eq!(points[0].run_id, "inv-3");
}

#[test]
fn trend_of_missing_metric_is_null() {
    let history = RunHistory::open_in_memory().unwrap();
    history
        .save_run_at(&make_invariant("inv-1", 0.0, Vec::new()), None, None, "", t0())
        .unwrap();
    let points = history.trend_at(TrendMetric::CanaryF1, 1, t0()).unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].value, None);
}

#[test]
fn integer_columns_trend_as_numbers() {
    let history = RunHistory::open_in_memory().unwrap();
    let inv = make_invariant("inv-1", 0.0, vec![Alert::critical("x"), Alert::warning("y")]);
    history.save_run_at(&inv, None, None, "", t0()).unwrap();
    let points = history.trend_at(TrendMetric::AlertCount, 1, t0()).unwrap();
    assert_eq!(points[0].value, Some(2.0));
}

// ─── Alert summary ───

#[test]
fn alert_summary_counts_by_level_within_window() {
    let history = RunHistory::open_in_memory().unwrap();
    let old = make_invariant("inv-old", 0.0, vec![Alert::critical("old")]);
    let new = make_invariant("inv-new", 0.0, vec![Alert::critical("a")]);
    let drift = make_drift(1.5, vec![Alert::warning("b"), Alert::warning("c")]);

    history
        .save_run_at(&old, None, None, "", t0() - Duration::days(30))
        .unwrap();
    history.save_run_at(&new, Some(&drift), None, "", t0()).unwrap();

    let summary = history.alert_summary_at(7, t0()).unwrap();
    assert_eq!(summary.get(&AlertLevel::Critical), Some(&1));
    assert_eq!(summary.get(&AlertLevel::Warning), Some(&2));
    assert_eq!(summary.get(&AlertLevel::Info), None);
}

// ─── Persistence ───

#[test]
fn runs_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");
    {
        let history = RunHistory::open(&path).unwrap();
        history
            .save_run_at(&make_invariant("inv-1", 0.03, Vec::new()), None, None, "", t0())
            .unwrap();
    }
    let history = RunHistory::open(&path).unwrap();
    assert_eq!(history.run_count().unwrap(), 1);
    assert_eq!(history.recent_runs(1).unwrap()[0].run_id, "inv-1");
}
