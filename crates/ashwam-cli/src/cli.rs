use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ashwam_core::config::CliOverrides;

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_OUT_DIR: &str = "./out";
pub const DEFAULT_BASELINE: &str = "parser_outputs_day0.jsonl";
pub const DEFAULT_CURRENT: &str = "parser_outputs_day1.jsonl";
pub const DEFAULT_JOURNALS: &str = "journals.jsonl";
pub const DEFAULT_CANARY_DIR: &str = "canary";
pub const DEFAULT_HISTORY_DB: &str = "run_history.db";

#[derive(Parser, Debug)]
#[command(name = "ashwam", version, about = "Extraction quality monitor")]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (default: <data>/ashwam.toml)")]
    pub config: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Debug-level logging")]
    pub verbose: bool,
    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,
    #[arg(long, global = true, help = "Print machine-readable JSON instead of text")]
    pub json: bool,
    #[arg(long, global = true, env = "ASHWAM_MAX_DAILY_REVIEWS")]
    pub max_daily_reviews: Option<usize>,
    #[arg(long, global = true, env = "ASHWAM_ESCALATION_TIMEOUT_HOURS")]
    pub escalation_timeout_hours: Option<u64>,
    #[arg(long, global = true)]
    pub max_hallucination_rate: Option<f64>,
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            max_daily_reviews: self.max_daily_reviews,
            escalation_timeout_hours: self.escalation_timeout_hours,
            max_hallucination_rate: self.max_hallucination_rate,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every check and write all reports.
    Run {
        #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
        data: PathBuf,
        #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
        out: PathBuf,
        #[arg(long, default_value = DEFAULT_BASELINE, help = "Baseline outputs, relative to --data")]
        baseline: String,
        #[arg(long, default_value = DEFAULT_CURRENT, help = "Current outputs, relative to --data")]
        current: String,
        #[arg(long, default_value = DEFAULT_JOURNALS, help = "Journals, relative to --data")]
        journals: String,
        #[arg(long, help = "Canary directory (default: <data>/canary when present)")]
        canary_dir: Option<PathBuf>,
        #[arg(long, help = "Run history database (default: <out>/run_history.db)")]
        history: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        no_history: bool,
    },
    /// Invariant checks only.
    Invariants {
        #[arg(long)]
        outputs: PathBuf,
        #[arg(long)]
        journals: PathBuf,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Compare two extractor output files.
    Drift {
        #[arg(long)]
        baseline: PathBuf,
        #[arg(long)]
        current: PathBuf,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Score outputs against the canary gold set.
    Canary {
        #[arg(long, help = "Directory holding gold.jsonl")]
        canary_dir: PathBuf,
        #[arg(long)]
        outputs: PathBuf,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Build the human review queue for a run.
    Review {
        #[arg(long)]
        outputs: PathBuf,
        #[arg(long)]
        journals: PathBuf,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Query the run history database.
    History {
        #[arg(long, default_value = "./out/run_history.db")]
        db: PathBuf,
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Inspect the resolved configuration.
    Config {
        #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
        data: PathBuf,
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    Recent {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    Trend {
        /// Column name, e.g. hallucination_rate or canary_f1.
        metric: String,
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    Alerts {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    Show,
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["ashwam", "run"]).unwrap();
        match cli.command {
            Commands::Run {
                data,
                out,
                baseline,
                no_history,
                canary_dir,
                ..
            } => {
                assert_eq!(data, PathBuf::from("./data"));
                assert_eq!(out, PathBuf::from("./out"));
                assert_eq!(baseline, "parser_outputs_day0.jsonl");
                assert!(!no_history);
                assert!(canary_dir.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ashwam",
            "run",
            "--max-daily-reviews",
            "5",
            "--max-hallucination-rate",
            "0.1",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.max_daily_reviews, Some(5));
        assert_eq!(overrides.max_hallucination_rate, Some(0.1));
    }

    #[test]
    fn history_trend_parses() {
        let cli =
            Cli::try_parse_from(["ashwam", "history", "trend", "canary_f1", "--days", "14"]).unwrap();
        match cli.command {
            Commands::History {
                command: HistoryCommands::Trend { metric, days },
                ..
            } => {
                assert_eq!(metric, "canary_f1");
                assert_eq!(days, 14);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
