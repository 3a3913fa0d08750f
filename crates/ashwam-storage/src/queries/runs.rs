//! Queries for the runs and alerts tables.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::Serialize;

use ashwam_core::errors::StorageError;
use ashwam_core::models::AlertLevel;

use crate::to_storage_err;

/// Columns of `runs` that can be trended. The column name is taken from this
/// closed set, never from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMetric {
    HallucinationRate,
    ContradictionRate,
    SchemaValidityRate,
    EvidenceValidityRate,
    ExtractionVolume,
    UncertaintyRate,
    CanaryF1,
    AlertCount,
    CriticalCount,
}

impl TrendMetric {
    pub const ALL: [TrendMetric; 9] = [
        Self::HallucinationRate,
        Self::ContradictionRate,
        Self::SchemaValidityRate,
        Self::EvidenceValidityRate,
        Self::ExtractionVolume,
        Self::UncertaintyRate,
        Self::CanaryF1,
        Self::AlertCount,
        Self::CriticalCount,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            Self::HallucinationRate => "hallucination_rate",
            Self::ContradictionRate => "contradiction_rate",
            Self::SchemaValidityRate => "schema_validity_rate",
            Self::EvidenceValidityRate => "evidence_validity_rate",
            Self::ExtractionVolume => "extraction_volume",
            Self::UncertaintyRate => "uncertainty_rate",
            Self::CanaryF1 => "canary_f1",
            Self::AlertCount => "alert_count",
            Self::CriticalCount => "critical_count",
        }
    }
}

impl fmt::Display for TrendMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for TrendMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.column() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|m| m.column()).collect();
                format!("unknown trend metric '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// Headline columns of one stored run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRow {
    pub run_id: String,
    pub timestamp: DateTime<Utc>,
    pub data_source: String,
    pub hallucination_rate: f64,
    pub contradiction_rate: f64,
    pub schema_validity_rate: f64,
    pub evidence_validity_rate: f64,
    pub extraction_volume: Option<f64>,
    pub uncertainty_rate: Option<f64>,
    pub canary_f1: Option<f64>,
    pub canary_action: Option<String>,
    pub alert_count: i64,
    pub critical_count: i64,
}

/// Row to insert. Built by the engine from the reports.
#[derive(Debug, Clone)]
pub struct NewRun<'a> {
    pub run_id: &'a str,
    pub timestamp: DateTime<Utc>,
    pub data_source: &'a str,
    pub hallucination_rate: f64,
    pub contradiction_rate: f64,
    pub schema_validity_rate: f64,
    pub evidence_validity_rate: f64,
    pub extraction_volume: Option<f64>,
    pub uncertainty_rate: Option<f64>,
    pub canary_f1: Option<f64>,
    pub canary_action: Option<&'a str>,
    pub alert_count: i64,
    pub critical_count: i64,
    pub full_report: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub run_id: String,
    /// `None` when the run did not produce this metric (e.g. no canary).
    pub value: Option<f64>,
}

/// Timestamps are stored as RFC 3339 UTC with millisecond precision, which
/// sorts lexicographically.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Insert or replace a run. Its previous alerts, if any, are removed.
pub fn upsert_run(conn: &Connection, run: &NewRun<'_>) -> Result<(), StorageError> {
    conn.execute("DELETE FROM alerts WHERE run_id = ?1", params![run.run_id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT OR REPLACE INTO runs (
            run_id, timestamp, data_source,
            hallucination_rate, contradiction_rate, schema_validity_rate, evidence_validity_rate,
            extraction_volume, uncertainty_rate, canary_f1, canary_action,
            alert_count, critical_count, full_report
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            run.run_id,
            format_timestamp(run.timestamp),
            run.data_source,
            run.hallucination_rate,
            run.contradiction_rate,
            run.schema_validity_rate,
            run.evidence_validity_rate,
            run.extraction_volume,
            run.uncertainty_rate,
            run.canary_f1,
            run.canary_action,
            run.alert_count,
            run.critical_count,
            run.full_report,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn insert_alert(
    conn: &Connection,
    run_id: &str,
    severity: AlertLevel,
    message: &str,
    at: DateTime<Utc>,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO alerts (run_id, severity, message, timestamp) VALUES (?1, ?2, ?3, ?4)",
        params![run_id, severity.as_str(), message, format_timestamp(at)],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Most recent runs first.
pub fn query_recent(conn: &Connection, limit: usize) -> Result<Vec<RunRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT run_id, timestamp, data_source,
                    hallucination_rate, contradiction_rate, schema_validity_rate,
                    evidence_validity_rate, extraction_volume, uncertainty_rate,
                    canary_f1, canary_action, alert_count, critical_count
             FROM runs ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![limit as i64], |row| {
            Ok(RunRow {
                run_id: row.get(0)?,
                timestamp: parse_timestamp(row, 1)?,
                data_source: row.get(2)?,
                hallucination_rate: row.get(3)?,
                contradiction_rate: row.get(4)?,
                schema_validity_rate: row.get(5)?,
                evidence_validity_rate: row.get(6)?,
                extraction_volume: row.get(7)?,
                uncertainty_rate: row.get(8)?,
                canary_f1: row.get(9)?,
                canary_action: row.get(10)?,
                alert_count: row.get(11)?,
                critical_count: row.get(12)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Values of `metric` for runs at or after `since`, oldest first.
pub fn query_trend(
    conn: &Connection,
    metric: TrendMetric,
    since: DateTime<Utc>,
) -> Result<Vec<TrendPoint>, StorageError> {
    let sql = format!(
        "SELECT timestamp, run_id, CAST({} AS REAL) FROM runs
         WHERE timestamp >= ?1 ORDER BY timestamp ASC, id ASC",
        metric.column()
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![format_timestamp(since)], |row| {
            Ok(TrendPoint {
                timestamp: parse_timestamp(row, 0)?,
                run_id: row.get(1)?,
                value: row.get(2)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Alert counts per severity for alerts at or after `since`.
pub fn alert_counts_since(
    conn: &Connection,
    since: DateTime<Utc>,
) -> Result<Vec<(String, i64)>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT severity, COUNT(*) FROM alerts
             WHERE timestamp >= ?1 GROUP BY severity ORDER BY severity",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![format_timestamp(since)], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// The serialized reports of one run.
pub fn query_full_report(conn: &Connection, run_id: &str) -> Result<Option<String>, StorageError> {
    match conn.query_row(
        "SELECT full_report FROM runs WHERE run_id = ?1",
        params![run_id],
        |row| row.get(0),
    ) {
        Ok(report) => Ok(Some(report)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(to_storage_err(e.to_string())),
    }
}

pub fn count_runs(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn count_alerts(conn: &Connection, run_id: &str) -> Result<i64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM alerts WHERE run_id = ?1",
        params![run_id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
