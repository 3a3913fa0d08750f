//! V001: runs and alerts.

pub const MIGRATION_SQL: &str = r#"
-- One row per monitoring run. Rates are copied out of the reports so trend
-- queries never parse JSON; full_report keeps everything else.
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id TEXT UNIQUE NOT NULL,
    timestamp TEXT NOT NULL,
    data_source TEXT NOT NULL DEFAULT '',
    hallucination_rate REAL NOT NULL,
    contradiction_rate REAL NOT NULL,
    schema_validity_rate REAL NOT NULL,
    evidence_validity_rate REAL NOT NULL,
    extraction_volume REAL,
    uncertainty_rate REAL,
    canary_f1 REAL,
    canary_action TEXT,
    alert_count INTEGER NOT NULL DEFAULT 0,
    critical_count INTEGER NOT NULL DEFAULT 0,
    full_report TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_runs_timestamp ON runs(timestamp);

CREATE TABLE IF NOT EXISTS alerts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id TEXT NOT NULL REFERENCES runs(run_id) ON DELETE CASCADE,
    severity TEXT NOT NULL,
    message TEXT NOT NULL,
    timestamp TEXT NOT NULL
);
"#;
