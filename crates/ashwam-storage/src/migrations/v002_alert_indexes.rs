//! V002: indexes for alert summaries and per-run alert lookups.

pub const MIGRATION_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_alerts_timestamp ON alerts(timestamp);
CREATE INDEX IF NOT EXISTS idx_alerts_run ON alerts(run_id);
"#;
