//! `ashwam run`: the full monitoring pass over one data directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use ashwam_analytics::{build_summary, confidence_report, diagnose, NarrativeContext};
use ashwam_canary::CanaryEngine;
use ashwam_core::constants::DEFAULT_CONFIDENCE_LEVEL;
use ashwam_core::errors::ErrorCode;
use ashwam_core::models::{
    journal_index, CanaryReport, DriftReport, ExtractionSnapshot, GoldLabel, InvariantReport,
    Journal, SummaryReport,
};
use ashwam_core::MonitorConfig;
use ashwam_drift::DriftEngine;
use ashwam_review::build_review_queue;
use ashwam_storage::RunHistory;
use ashwam_validation::InvariantEngine;

use super::{data_file, file_label, load_records, print_one, GOLD_FILE};
use crate::cli::DEFAULT_CANARY_DIR;
use crate::writer;

/// Resolved input and output locations.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub data: PathBuf,
    pub out: PathBuf,
    pub baseline: String,
    pub current: String,
    pub journals: String,
    /// Explicit canary directory. When `None`, `<data>/canary` is used if it exists.
    pub canary_dir: Option<PathBuf>,
    /// History database. `None` skips persistence.
    pub history: Option<PathBuf>,
}

impl RunPaths {
    pub fn new(data: impl Into<PathBuf>, out: impl Into<PathBuf>) -> Self {
        Self {
            data: data.into(),
            out: out.into(),
            baseline: crate::cli::DEFAULT_BASELINE.to_string(),
            current: crate::cli::DEFAULT_CURRENT.to_string(),
            journals: crate::cli::DEFAULT_JOURNALS.to_string(),
            canary_dir: None,
            history: None,
        }
    }

    fn resolved_canary_dir(&self) -> Option<PathBuf> {
        match &self.canary_dir {
            Some(dir) => Some(dir.clone()),
            None => {
                let candidate = self.data.join(DEFAULT_CANARY_DIR);
                candidate.join(GOLD_FILE).exists().then_some(candidate)
            }
        }
    }
}

#[derive(Debug)]
pub struct RunOutcome {
    pub invariant: InvariantReport,
    pub drift: DriftReport,
    pub canary: Option<CanaryReport>,
    pub summary: SummaryReport,
    pub written: Vec<PathBuf>,
    pub saved_run_id: Option<String>,
}

#[derive(Serialize)]
struct OutcomeView<'a> {
    summary: &'a SummaryReport,
    written: Vec<String>,
    saved_run_id: Option<&'a str>,
}

pub fn run_monitor(
    paths: &RunPaths,
    config: &MonitorConfig,
    now: DateTime<Utc>,
) -> anyhow::Result<RunOutcome> {
    tracing::info!(data = %paths.data.display(), out = %paths.out.display(), "monitoring run started");

    let journals = load_records::<Journal>(&data_file(&paths.data, &paths.journals))?;
    let index = journal_index(&journals);
    let baseline_path = data_file(&paths.data, &paths.baseline);
    let current_path = data_file(&paths.data, &paths.current);
    let baseline = load_records::<ExtractionSnapshot>(&baseline_path)?;
    let current = load_records::<ExtractionSnapshot>(&current_path)?;

    let invariant = InvariantEngine::new(config.invariants).run_at(&current, &index, now);
    let drift = DriftEngine::new(config.drift).compare_at(
        &baseline,
        &current,
        &file_label(&baseline_path),
        &file_label(&current_path),
        now,
    );
    let canary = match paths.resolved_canary_dir() {
        Some(dir) => Some(evaluate_canary(&dir, &current, config, now)?),
        None => {
            tracing::info!("no canary directory, skipping canary evaluation");
            None
        }
    };
    let summary = build_summary(&invariant, Some(&drift), canary.as_ref(), now);
    let mut queue = build_review_queue(&invariant, &current, config.human_review, now);
    queue.escalate_aged_items_at(now);

    let out = &paths.out;
    let mut written = vec![
        writer::write_json(out, writer::INVARIANT_REPORT_FILE, &invariant)?,
        writer::write_json(out, writer::DRIFT_REPORT_FILE, &drift)?,
    ];
    if let Some(report) = &canary {
        written.push(writer::write_json(out, writer::CANARY_REPORT_FILE, report)?);
    }
    written.push(writer::write_json(out, writer::SUMMARY_FILE, &summary)?);
    written.push(writer::write_json(
        out,
        writer::CONFIDENCE_REPORT_FILE,
        &confidence_report(&invariant, DEFAULT_CONFIDENCE_LEVEL),
    )?);
    written.push(writer::write_json(out, writer::DIAGNOSIS_FILE, &diagnose(&invariant))?);
    written.push(writer::write_review_queue(out, &queue, now)?);

    let mut ctx = NarrativeContext::new(&invariant, &current, &index, now).with_drift(&drift);
    if let Some(report) = &canary {
        ctx = ctx.with_canary(report);
    }
    written.extend(writer::write_narratives(out, &ctx)?);

    let saved_run_id = match &paths.history {
        Some(db) => Some(save_history(db, &invariant, &drift, canary.as_ref(), &paths.data, now)?),
        None => None,
    };

    tracing::info!(
        status = %summary.overall_status,
        files = written.len(),
        "monitoring run finished"
    );
    Ok(RunOutcome {
        invariant,
        drift,
        canary,
        summary,
        written,
        saved_run_id,
    })
}

/// Score the current outputs for the gold journals only.
fn evaluate_canary(
    dir: &Path,
    current: &[ExtractionSnapshot],
    config: &MonitorConfig,
    now: DateTime<Utc>,
) -> anyhow::Result<CanaryReport> {
    let gold = load_records::<GoldLabel>(&dir.join(GOLD_FILE))?;
    let gold_ids: HashSet<&str> = gold.iter().map(|g| g.journal_id.as_str()).collect();
    let outputs: Vec<ExtractionSnapshot> = current
        .iter()
        .filter(|s| gold_ids.contains(s.journal_id.as_str()))
        .cloned()
        .collect();
    Ok(CanaryEngine::new(config.canary).evaluate_at(&outputs, &gold, now))
}

fn save_history(
    db: &Path,
    invariant: &InvariantReport,
    drift: &DriftReport,
    canary: Option<&CanaryReport>,
    data: &Path,
    now: DateTime<Utc>,
) -> anyhow::Result<String> {
    let history = RunHistory::open(db).map_err(|e| anyhow::anyhow!(e.coded_string()))?;
    history
        .save_run_at(invariant, Some(drift), canary, &data.display().to_string(), now)
        .map_err(|e| anyhow::anyhow!(e.coded_string()))
}

pub fn print_outcome(json: bool, outcome: &RunOutcome) -> anyhow::Result<()> {
    let view = OutcomeView {
        summary: &outcome.summary,
        written: outcome
            .written
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        saved_run_id: outcome.saved_run_id.as_deref(),
    };
    print_one(json, view, |v| {
        let s = v.summary;
        let mut lines = vec![
            format!("status: {}", s.overall_status),
            format!(
                "hallucination {:.1}%  contradiction {:.1}%  schema {:.1}%",
                s.invariant_summary.hallucination_rate * 100.0,
                s.invariant_summary.contradiction_rate * 100.0,
                s.invariant_summary.schema_validity_rate * 100.0
            ),
        ];
        for (metric, status) in &s.drift_summary {
            lines.push(format!("drift {metric}: {status}"));
        }
        if let Some(c) = &s.canary_summary {
            lines.push(format!("canary f1 {:.3}: {}", c.f1, c.action));
        }
        lines.extend(s.critical_alerts.iter().map(|a| a.to_string()));
        lines.push(format!("action: {}", s.recommended_action));
        lines.push(format!("wrote {} files", v.written.len()));
        if let Some(id) = v.saved_run_id {
            lines.push(format!("saved run {id}"));
        }
        lines.join("\n")
    })
}
