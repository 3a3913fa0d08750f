//! Subcommand handlers. Each loads its inputs, calls the engines with an
//! explicit config, writes reports, and prints a console result.

pub mod history;
pub mod run;

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;

use ashwam_analytics::{confidence_report, diagnose};
use ashwam_canary::CanaryEngine;
use ashwam_core::constants::DEFAULT_CONFIDENCE_LEVEL;
use ashwam_core::errors::ErrorCode;
use ashwam_core::models::{
    journal_index, ExtractionSnapshot, GoldLabel, InvariantReport, Journal, JournalIndex,
};
use ashwam_core::MonitorConfig;
use ashwam_drift::DriftEngine;
use ashwam_review::build_review_queue;
use ashwam_validation::InvariantEngine;

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::loader::{load_jsonl, LoadOutcome, Record};
use crate::writer;

pub const GOLD_FILE: &str = "gold.jsonl";

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let overrides = cli.overrides();
    let load_config = |data_dir: &Path| -> anyhow::Result<MonitorConfig> {
        MonitorConfig::load(data_dir, cli.config.as_deref(), Some(&overrides))
            .map_err(|e| anyhow::anyhow!(e.coded_string()))
    };

    match &cli.command {
        Commands::Run {
            data,
            out,
            baseline,
            current,
            journals,
            canary_dir,
            history,
            no_history,
        } => {
            let config = load_config(data)?;
            let paths = run::RunPaths {
                data: data.clone(),
                out: out.clone(),
                baseline: baseline.clone(),
                current: current.clone(),
                journals: journals.clone(),
                canary_dir: canary_dir.clone(),
                history: if *no_history {
                    None
                } else {
                    Some(history.clone().unwrap_or_else(|| out.join(crate::cli::DEFAULT_HISTORY_DB)))
                },
            };
            let outcome = run::run_monitor(&paths, &config, Utc::now())?;
            run::print_outcome(cli.json, &outcome)
        }
        Commands::Invariants {
            outputs,
            journals,
            out,
        } => {
            let config = load_config(parent_dir(outputs))?;
            let (snapshots, index) = load_run_inputs(outputs, journals)?;
            let report = InvariantEngine::new(config.invariants).run(&snapshots, &index);
            if let Some(dir) = out {
                writer::write_json(dir, writer::INVARIANT_REPORT_FILE, &report)?;
                writer::write_json(
                    dir,
                    writer::CONFIDENCE_REPORT_FILE,
                    &confidence_report(&report, DEFAULT_CONFIDENCE_LEVEL),
                )?;
                writer::write_json(dir, writer::DIAGNOSIS_FILE, &diagnose(&report))?;
            }
            print_one(cli.json, &report, |r| invariant_lines(r))
        }
        Commands::Drift {
            baseline,
            current,
            out,
        } => {
            let config = load_config(parent_dir(current))?;
            let base = load_records::<ExtractionSnapshot>(baseline)?;
            let cur = load_records::<ExtractionSnapshot>(current)?;
            let report = DriftEngine::new(config.drift).compare(
                &base,
                &cur,
                &file_label(baseline),
                &file_label(current),
            );
            if let Some(dir) = out {
                writer::write_json(dir, writer::DRIFT_REPORT_FILE, &report)?;
            }
            print_one(cli.json, &report, |r| {
                let mut lines: Vec<String> = r
                    .metrics
                    .iter()
                    .map(|m| {
                        format!(
                            "{:<24} {:>10.4} -> {:<10.4} {:>+8.1}%  {}",
                            m.name.as_str(),
                            m.baseline_value,
                            m.current_value,
                            m.change_pct,
                            m.status
                        )
                    })
                    .collect();
                lines.extend(r.alerts.iter().map(|a| a.to_string()));
                lines.join("\n")
            })
        }
        Commands::Canary {
            canary_dir,
            outputs,
            out,
        } => {
            let config = load_config(canary_dir)?;
            let gold = load_records::<GoldLabel>(&canary_dir.join(GOLD_FILE))?;
            let snapshots = load_records::<ExtractionSnapshot>(outputs)?;
            let report = CanaryEngine::new(config.canary).evaluate(&snapshots, &gold);
            if let Some(dir) = out {
                writer::write_json(dir, writer::CANARY_REPORT_FILE, &report)?;
            }
            print_one(cli.json, &report, |r| {
                format!(
                    "precision {:.3}  recall {:.3}  f1 {:.3}  evidence {:.3}\naction: {} ({})",
                    r.precision, r.recall, r.f1, r.evidence_match_rate, r.action, r.action_reason
                )
            })
        }
        Commands::Review {
            outputs,
            journals,
            out,
        } => {
            let config = load_config(parent_dir(outputs))?;
            let (snapshots, index) = load_run_inputs(outputs, journals)?;
            let now = Utc::now();
            let report = InvariantEngine::new(config.invariants).run_at(&snapshots, &index, now);
            let mut queue = build_review_queue(&report, &snapshots, config.human_review, now);
            queue.escalate_aged_items_at(now);
            if let Some(dir) = out {
                writer::write_review_queue(dir, &queue, now)?;
            }
            let batch = queue.daily_batch_at(now);
            print_out(cli.json, &batch, |item| {
                format!(
                    "{}\t{}\t{}\t{}\t{}",
                    item.id, item.severity, item.journal_id, item.violation_type, item.details
                )
            })
        }
        Commands::History { db, command } => history::execute(cli.json, db, command),
        Commands::Config { data, command } => {
            let config = load_config(data)?;
            match command {
                ConfigCommands::Show => {
                    if cli.json {
                        print_one(true, &config, |_| String::new())
                    } else {
                        print!("{}", config.to_toml().map_err(|e| anyhow::anyhow!(e.coded_string()))?);
                        Ok(())
                    }
                }
                ConfigCommands::Validate => print_one(cli.json, "configuration valid", |m| m.to_string()),
            }
        }
    }
}

/// Load a JSONL file, logging rejected lines and keeping the rest.
pub fn load_records<T: Record>(path: &Path) -> anyhow::Result<Vec<T>> {
    let LoadOutcome { records, errors } =
        load_jsonl::<T>(path).map_err(|e| anyhow::anyhow!(e.coded_string()))?;
    for err in &errors {
        tracing::warn!(path = %path.display(), %err, "record rejected");
    }
    Ok(records)
}

pub fn load_run_inputs(
    outputs: &Path,
    journals: &Path,
) -> anyhow::Result<(Vec<ExtractionSnapshot>, JournalIndex)> {
    let snapshots = load_records::<ExtractionSnapshot>(outputs)
        .with_context(|| format!("loading outputs {}", outputs.display()))?;
    let journals = load_records::<Journal>(journals)
        .with_context(|| format!("loading journals {}", journals.display()))?;
    Ok((snapshots, journal_index(&journals)))
}

pub fn invariant_lines(report: &InvariantReport) -> String {
    let mut lines = vec![
        format!(
            "items {}  journals {}",
            report.total_items, report.total_journals
        ),
        format!("schema validity     {:.1}%", report.schema_validity_rate * 100.0),
        format!("evidence validity   {:.1}%", report.evidence_validity_rate * 100.0),
        format!("hallucination rate  {:.1}%", report.hallucination_rate * 100.0),
        format!("contradiction rate  {:.1}%", report.contradiction_rate * 100.0),
    ];
    lines.extend(report.alerts.iter().map(|a| a.to_string()));
    lines.join("\n")
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

/// File name without extension, used as a drift source label.
pub fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub(crate) fn data_file(data: &Path, name: &str) -> PathBuf {
    data.join(name)
}
