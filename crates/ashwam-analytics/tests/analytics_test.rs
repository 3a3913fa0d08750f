//! Summary, confidence report, diagnosis, and narrative tests over real
//! engine output.

use std::collections::{BTreeMap, HashMap};

use chrono::{TimeZone, Utc};

use ashwam_analytics::summary::{ACTION_BLOCK, ACTION_MONITOR, ACTION_NONE, ACTION_ROLLBACK};
use ashwam_analytics::{
    build_summary, confidence_report, create_renderer, diagnose, DiagnosisSeverity,
    NarrativeContext, Significance,
};
use ashwam_canary::CanaryEngine;
use ashwam_core::config::DriftThresholds;
use ashwam_core::models::*;
use ashwam_validation::InvariantEngine;

fn make_item(domain: Domain, span: &str, polarity: Polarity) -> ExtractedItem {
    ExtractedItem {
        domain,
        text: String::new(),
        evidence_span: span.to_string(),
        polarity,
        time_bucket: "today".to_string(),
        intensity_bucket: (!domain.requires_arousal()).then_some(IntensityBucket::Medium),
        arousal_bucket: domain.requires_arousal().then_some(ArousalBucket::Medium),
        confidence: 0.9,
    }
}

fn make_journals(entries: &[(&str, &str)]) -> JournalIndex {
    entries
        .iter()
        .map(|(id, text)| (id.to_string(), text.to_string()))
        .collect::<HashMap<_, _>>()
}

fn clean_run() -> (Vec<ExtractionSnapshot>, JournalIndex) {
    let snapshots = vec![
        ExtractionSnapshot {
            journal_id: "j1".into(),
            items: vec![
                make_item(Domain::Symptom, "mild headache", Polarity::Present),
                make_item(Domain::Food, "oatmeal", Polarity::Present),
            ],
        },
        ExtractionSnapshot {
            journal_id: "j2".into(),
            items: vec![make_item(Domain::Emotion, "calm", Polarity::Present)],
        },
    ];
    let journals = make_journals(&[
        ("j1", "Mild headache after oatmeal for breakfast."),
        ("j2", "Felt calm most of the evening."),
    ]);
    (snapshots, journals)
}

/// Three journals that all hallucinate "back pain", plus one conflict.
fn noisy_run() -> (Vec<ExtractionSnapshot>, JournalIndex) {
    let mut snapshots: Vec<ExtractionSnapshot> = (1..=3)
        .map(|i| ExtractionSnapshot {
            journal_id: format!("n{i}"),
            items: vec![
                make_item(Domain::Food, "toast", Polarity::Present),
                make_item(Domain::Symptom, "back pain", Polarity::Present),
            ],
        })
        .collect();
    snapshots.push(ExtractionSnapshot {
        journal_id: "n4".into(),
        items: vec![
            make_item(Domain::Symptom, "no cramps", Polarity::Absent),
            make_item(Domain::Symptom, "no cramps", Polarity::Present),
        ],
    });
    let journals = make_journals(&[
        ("n1", "Toast for breakfast."),
        ("n2", "Just toast today."),
        ("n3", "Toast and tea."),
        ("n4", "Happily no cramps this morning."),
    ]);
    (snapshots, journals)
}

fn stable_drift(status: DriftStatus) -> DriftReport {
    DriftReport {
        run_id: "drift-test".into(),
        timestamp: Utc::now(),
        baseline_source: "day0".into(),
        current_source: "day1".into(),
        metrics: vec![DriftMetric {
            name: MetricName::IntensityDistribution,
            baseline_value: 0.5,
            current_value: 0.7,
            change_pct: 40.0,
            js_divergence: Some(0.2),
            ks_statistic: None,
            ks_pvalue: None,
            chi_squared_pvalue: None,
            status,
        }],
        alerts: Vec::new(),
        thresholds: DriftThresholds::default(),
        normal_definitions: BTreeMap::new(),
    }
}

// ─── Summary ───

#[test]
fn clean_run_is_healthy() {
    let (snapshots, journals) = clean_run();
    let inv = InvariantEngine::default().run(&snapshots, &journals);
    let summary = build_summary(&inv, None, None, Utc::now());

    assert_eq!(summary.overall_status, OverallStatus::Healthy);
    assert_eq!(summary.recommended_action, ACTION_NONE);
    assert!(summary.run_id.starts_with("summary-"));
    assert!(summary.critical_alerts.is_empty());
    assert!(summary.drift_summary.is_empty());
    assert!(summary.canary_summary.is_none());
}

#[test]
fn critical_alerts_make_run_critical() {
    let (snapshots, journals) = noisy_run();
    let inv = InvariantEngine::default().run(&snapshots, &journals);
    let summary = build_summary(&inv, None, None, Utc::now());

    assert_eq!(summary.overall_status, OverallStatus::Critical);
    assert_eq!(summary.recommended_action, ACTION_BLOCK);
    assert!(summary.critical_alerts.iter().all(Alert::is_critical));
    assert!(!summary.critical_alerts.is_empty());
}

#[test]
fn drift_breakage_without_alerts_is_degraded() {
    let (snapshots, journals) = clean_run();
    let inv = InvariantEngine::default().run(&snapshots, &journals);
    let drift = stable_drift(DriftStatus::Breakage);
    let summary = build_summary(&inv, Some(&drift), None, Utc::now());

    assert_eq!(summary.overall_status, OverallStatus::Degraded);
    assert_eq!(summary.recommended_action, ACTION_MONITOR);
    assert_eq!(
        summary.drift_summary.get(&MetricName::IntensityDistribution),
        Some(&DriftStatus::Breakage)
    );
}

#[test]
fn canary_rollback_overrides_everything() {
    let (snapshots, journals) = clean_run();
    let inv = InvariantEngine::default().run(&snapshots, &journals);
    let gold = vec![GoldLabel {
        journal_id: "c1".into(),
        items: vec![GoldItem {
            domain: Domain::Symptom,
            evidence_span: "sharp cramps".into(),
            polarity: Polarity::Present,
            time_bucket: "today".into(),
            intensity_bucket: Some(IntensityBucket::High),
            arousal_bucket: None,
        }],
    }];
    let canary = CanaryEngine::default().evaluate(&[], &gold);
    assert_eq!(canary.action, CanaryAction::Rollback);

    let summary = build_summary(&inv, None, Some(&canary), Utc::now());
    assert_eq!(summary.overall_status, OverallStatus::Critical);
    assert_eq!(summary.recommended_action, ACTION_ROLLBACK);
    assert_eq!(summary.canary_summary.map(|c| c.action), Some(CanaryAction::Rollback));
}

// ─── Confidence report ───

#[test]
fn confidence_report_covers_four_rates() {
    let (snapshots, journals) = noisy_run();
    let inv = InvariantEngine::default().run(&snapshots, &journals);
    let report = confidence_report(&inv, 0.95);

    assert_eq!(report.sample_size, 8);
    assert_eq!(report.metrics.len(), 4);
    let hall = report.metric("hallucination_rate").unwrap();
    assert_eq!(hall.point_estimate, inv.hallucination_rate);
    assert!(hall.lower_bound <= hall.point_estimate && hall.point_estimate <= hall.upper_bound);
    // 3 of 8 hallucinated: even the lower bound clears 5%.
    assert_eq!(hall.significance, Significance::Significant);
    assert!(report.interpretation.starts_with("Statistically significant"));
}

#[test]
fn clean_small_sample_is_ambiguous() {
    let (snapshots, journals) = clean_run();
    let inv = InvariantEngine::default().run(&snapshots, &journals);
    let report = confidence_report(&inv, 0.95);

    // Zero hallucinations over 3 items cannot rule out a 5% rate.
    let hall = report.metric("hallucination_rate").unwrap();
    assert_eq!(hall.significance, Significance::Ambiguous);
    assert!(report.interpretation.starts_with("Uncertain"));
}

// ─── Diagnosis ───

#[test]
fn noisy_run_diagnosis() {
    let (snapshots, journals) = noisy_run();
    let inv = InvariantEngine::default().run(&snapshots, &journals);
    let diagnosis = diagnose(&inv);

    assert_eq!(diagnosis.severity, DiagnosisSeverity::High);
    assert!(diagnosis
        .likely_causes
        .iter()
        .any(|c| c.contains("'back pain'")));
    assert!(diagnosis
        .recommended_actions
        .iter()
        .any(|a| a == "Add negation examples to the extractor prompt"));

    let json = serde_json::to_value(&diagnosis).unwrap();
    assert_eq!(json["severity"], "high");
    assert_eq!(json["patterns_detected"][0]["type"], "systematic_hallucination");
}

// ─── Narratives ───

#[test]
fn pm_dashboard_reports_status_and_actions() {
    let (snapshots, journals) = noisy_run();
    let inv = InvariantEngine::default().run(&snapshots, &journals);
    let at = Utc.with_ymd_and_hms(2026, 1, 18, 9, 30, 0).unwrap();
    let ctx = NarrativeContext::new(&inv, &snapshots, &journals, at);

    let text = create_renderer("pm").unwrap().render(&ctx);
    assert!(text.starts_with("## System Health - 2026-01-18 09:30"));
    assert!(text.contains("🔴 CRITICAL"));
    assert!(text.contains("| hallucination_rate | 37.5% | ⚠️ |"));
    assert!(text.contains("1. review extractor prompt for hallucination patterns"));
    assert!(text.contains("2. investigate contradiction source"));
}

#[test]
fn clinician_notes_hide_journal_ids() {
    let (snapshots, journals) = noisy_run();
    let inv = InvariantEngine::default().run(&snapshots, &journals);
    let ctx = NarrativeContext::new(&inv, &snapshots, &journals, Utc::now());

    let text = create_renderer("clinician").unwrap().render(&ctx);
    assert!(text.contains("[span not found in source: 'back pain']"));
    assert!(text.contains("### Conflict Detected"));
    assert!(!text.contains("n1"));
}

#[test]
fn user_summary_withholds_flagged_items() {
    let (snapshots, journals) = noisy_run();
    let inv = InvariantEngine::default().run(&snapshots, &journals);
    let ctx = NarrativeContext::new(&inv, &snapshots, &journals, Utc::now());

    let text = create_renderer("user").unwrap().render(&ctx);
    assert!(text.contains("- Food: toast"));
    assert!(!text.contains("back pain"));
    assert!(text.contains("**Does this look right?**"));
}

#[test]
fn review_sheet_lists_every_violation() {
    let (snapshots, journals) = noisy_run();
    let inv = InvariantEngine::default().run(&snapshots, &journals);
    let at = Utc.with_ymd_and_hms(2026, 1, 18, 9, 30, 0).unwrap();
    let ctx = NarrativeContext::new(&inv, &snapshots, &journals, at);

    let text = create_renderer("review_sheet").unwrap().render(&ctx);
    assert!(text.starts_with("# Human Review Queue - 2026-01-18"));
    assert!(text.contains(&format!("**Total items for review:** {}", inv.violations.len())));
    assert!(text.contains("> Toast for breakfast."));
    assert!(text.contains("**Reviewer signature:**"));
}
