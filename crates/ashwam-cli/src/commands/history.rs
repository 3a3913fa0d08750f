//! `ashwam history`: read-only queries over the run history database.

use std::path::Path;

use anyhow::bail;

use ashwam_core::errors::ErrorCode;
use ashwam_storage::{RunHistory, TrendMetric};

use super::{print_one, print_out};
use crate::cli::HistoryCommands;

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}

pub fn execute(json: bool, db: &Path, command: &HistoryCommands) -> anyhow::Result<()> {
    if !db.exists() {
        bail!("no run history at {}", db.display());
    }
    let history = RunHistory::open(db).map_err(|e| anyhow::anyhow!(e.coded_string()))?;

    match command {
        HistoryCommands::Recent { limit } => {
            let runs = history
                .recent_runs(*limit)
                .map_err(|e| anyhow::anyhow!(e.coded_string()))?;
            print_out(json, &runs, |r| {
                format!(
                    "{}\t{}\thall {:.4}\tcontra {:.4}\tf1 {}\talerts {} ({} critical)",
                    r.timestamp.format("%Y-%m-%d %H:%M"),
                    r.run_id,
                    r.hallucination_rate,
                    r.contradiction_rate,
                    fmt_opt(r.canary_f1),
                    r.alert_count,
                    r.critical_count
                )
            })
        }
        HistoryCommands::Trend { metric, days } => {
            let metric: TrendMetric = metric.parse().map_err(anyhow::Error::msg)?;
            let points = history
                .trend(metric, *days)
                .map_err(|e| anyhow::anyhow!(e.coded_string()))?;
            print_out(json, &points, |p| {
                format!(
                    "{}\t{}\t{}",
                    p.timestamp.format("%Y-%m-%d %H:%M"),
                    p.run_id,
                    fmt_opt(p.value)
                )
            })
        }
        HistoryCommands::Alerts { days } => {
            let summary = history
                .alert_summary(*days)
                .map_err(|e| anyhow::anyhow!(e.coded_string()))?;
            print_one(json, &summary, |s| {
                if s.is_empty() {
                    return format!("no alerts in the last {days} days");
                }
                s.iter()
                    .map(|(level, count)| format!("{level}\t{count}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
    }
}
