//! End-to-end `run` tests over a small data directory on disk.

use std::path::Path;

use chrono::{TimeZone, Utc};

use ashwam_cli::commands::run::{run_monitor, RunPaths};
use ashwam_cli::loader::{load_jsonl, LoadOutcome};
use ashwam_core::errors::LoadError;
use ashwam_core::models::{CanaryAction, ExtractionSnapshot, OverallStatus};
use ashwam_core::MonitorConfig;
use ashwam_storage::RunHistory;

const JOURNALS: &str = r#"{"journal_id":"j1","text":"Woke up with a mild headache, had oatmeal for breakfast."}
{"journal_id":"j2","text":"Felt anxious before the meeting but calm afterwards."}
{"journal_id":"c1","text":"Sharp cramps in the afternoon, skipped lunch."}
"#;

const HEADACHE: &str = r#"{"domain":"symptom","evidence_span":"mild headache","polarity":"present","time_bucket":"today","intensity_bucket":"medium","confidence":0.9}"#;
const OATMEAL: &str = r#"{"domain":"food","evidence_span":"oatmeal","polarity":"present","time_bucket":"today","intensity_bucket":"low","confidence":0.8}"#;
const ANXIOUS: &str = r#"{"domain":"emotion","evidence_span":"anxious","polarity":"present","time_bucket":"today","arousal_bucket":"high","confidence":0.85}"#;
const BACK_PAIN: &str = r#"{"domain":"symptom","evidence_span":"back pain","polarity":"present","time_bucket":"today","intensity_bucket":"medium","confidence":0.6}"#;
const CRAMPS: &str = r#"{"domain":"symptom","evidence_span":"sharp cramps","polarity":"present","time_bucket":"today","intensity_bucket":"high","confidence":0.9}"#;

const GOLD: &str = r#"{"journal_id":"c1","items":[{"domain":"symptom","evidence_span":"sharp cramps","polarity":"present","time_bucket":"today","intensity_bucket":"high"}]}
"#;

fn make_snapshot(journal_id: &str, items: &[&str]) -> String {
    format!(r#"{{"journal_id":"{journal_id}","items":[{}]}}"#, items.join(","))
}

fn make_data_dir(root: &Path, with_canary: bool) {
    std::fs::write(root.join("journals.jsonl"), JOURNALS).unwrap();
    let day0 = [
        make_snapshot("j1", &[HEADACHE, OATMEAL]),
        make_snapshot("j2", &[ANXIOUS]),
    ]
    .join("\n");
    let day1 = [
        make_snapshot("j1", &[HEADACHE, OATMEAL]),
        make_snapshot("j2", &[ANXIOUS, BACK_PAIN]),
        make_snapshot("c1", &[CRAMPS]),
        "{broken".to_string(),
    ]
    .join("\n");
    std::fs::write(root.join("parser_outputs_day0.jsonl"), day0).unwrap();
    std::fs::write(root.join("parser_outputs_day1.jsonl"), day1).unwrap();
    if with_canary {
        std::fs::create_dir_all(root.join("canary")).unwrap();
        std::fs::write(root.join("canary").join("gold.jsonl"), GOLD).unwrap();
    }
}

// ─── Full run ───

#[test]
fn full_run_writes_every_report() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tmp.path().join("data");
    let out = tmp.path().join("out");
    std::fs::create_dir_all(&data).unwrap();
    make_data_dir(&data, true);

    let mut paths = RunPaths::new(&data, &out);
    paths.history = Some(out.join("run_history.db"));
    let now = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
    let outcome = run_monitor(&paths, &MonitorConfig::default(), now).unwrap();

    // The broken line is skipped, three snapshots remain.
    assert_eq!(outcome.invariant.total_journals, 3);
    assert_eq!(outcome.invariant.total_items, 5);
    assert_eq!(outcome.invariant.hallucination_rate, 0.2);
    assert_eq!(outcome.summary.overall_status, OverallStatus::Critical);

    let canary = outcome.canary.as_ref().unwrap();
    assert_eq!(canary.matched_count, 1);
    assert_eq!(canary.action, CanaryAction::Pass);

    for name in [
        "invariant_report.json",
        "drift_report.json",
        "canary_report.json",
        "summary.json",
        "confidence_report.json",
        "diagnosis.json",
        "review_queue.json",
        "pm_view.md",
        "clinician_view.md",
        "user_view.md",
        "review_sheet.md",
    ] {
        assert!(out.join(name).exists(), "missing {name}");
    }

    let queue: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("review_queue.json")).unwrap())
            .unwrap();
    assert_eq!(queue["summary"]["total_items"], outcome.invariant.violations.len());
    assert!(!queue["critical"].as_array().unwrap().is_empty());

    let history = RunHistory::open(&out.join("run_history.db")).unwrap();
    assert_eq!(history.run_count().unwrap(), 1);
    assert_eq!(outcome.saved_run_id.as_deref(), Some(outcome.invariant.run_id.as_str()));
}

#[test]
fn run_without_canary_directory_skips_canary() {
    let tmp = tempfile::tempdir().unwrap();
    make_data_dir(tmp.path(), false);
    let out = tmp.path().join("out");

    let outcome = run_monitor(&RunPaths::new(tmp.path(), &out), &MonitorConfig::default(), Utc::now())
        .unwrap();

    assert!(outcome.canary.is_none());
    assert!(outcome.summary.canary_summary.is_none());
    assert!(outcome.saved_run_id.is_none());
    assert!(!out.join("canary_report.json").exists());
}

#[test]
fn missing_journals_file_fails_the_run() {
    let tmp = tempfile::tempdir().unwrap();
    let err = run_monitor(
        &RunPaths::new(tmp.path(), tmp.path().join("out")),
        &MonitorConfig::default(),
        Utc::now(),
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("file not found"));
}

// ─── Loader ───

#[test]
fn load_jsonl_reports_missing_file() {
    let tmp = tempfile::tempdir().unwrap();
    let result = load_jsonl::<ExtractionSnapshot>(&tmp.path().join("nope.jsonl"));
    assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
}

#[test]
fn load_jsonl_keeps_valid_lines() {
    let tmp = tempfile::tempdir().unwrap();
    make_data_dir(tmp.path(), false);
    let LoadOutcome { records, errors } =
        load_jsonl::<ExtractionSnapshot>(&tmp.path().join("parser_outputs_day1.jsonl")).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 4);
}
