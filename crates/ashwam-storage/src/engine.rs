//! RunHistory: owns the connection, runs migrations, stores and queries runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use ashwam_core::errors::StorageError;
use ashwam_core::models::{AlertLevel, CanaryReport, DriftReport, InvariantReport, MetricName};

use crate::connection::pragmas::apply_pragmas;
use crate::migrations;
use crate::queries::runs::{self, NewRun, RunRow, TrendMetric, TrendPoint};
use crate::to_storage_err;

/// Everything a run produced, as stored in `runs.full_report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReports {
    pub invariant: InvariantReport,
    #[serde(default)]
    pub drift: Option<DriftReport>,
    #[serde(default)]
    pub canary: Option<CanaryReport>,
}

pub struct RunHistory {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl RunHistory {
    /// Open (or create) a history database at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                to_storage_err(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, true)?;
        migrations::run_migrations(&conn)?;
        tracing::debug!(path = %path.display(), "run history opened");
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, false)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StorageError>,
    {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| to_storage_err("connection lock poisoned".to_string()))?;
        f(&mut guard)
    }

    /// Store one run. The run id is the invariant report's; saving the same
    /// id again replaces the earlier row and its alerts.
    pub fn save_run(
        &self,
        invariant: &InvariantReport,
        drift: Option<&DriftReport>,
        canary: Option<&CanaryReport>,
        data_source: &str,
    ) -> Result<String, StorageError> {
        self.save_run_at(invariant, drift, canary, data_source, Utc::now())
    }

    /// [`save_run`](Self::save_run) with an explicit timestamp.
    pub fn save_run_at(
        &self,
        invariant: &InvariantReport,
        drift: Option<&DriftReport>,
        canary: Option<&CanaryReport>,
        data_source: &str,
        now: DateTime<Utc>,
    ) -> Result<String, StorageError> {
        let stored = StoredReports {
            invariant: invariant.clone(),
            drift: drift.cloned(),
            canary: canary.cloned(),
        };
        let full_report = serde_json::to_string(&stored).map_err(|e| StorageError::Serialization {
            message: e.to_string(),
        })?;

        let alerts: Vec<_> = invariant
            .alerts
            .iter()
            .chain(drift.into_iter().flat_map(|d| d.alerts.iter()))
            .collect();
        let critical_count = alerts.iter().filter(|a| a.is_critical()).count();
        let drift_value = |name: MetricName| drift.and_then(|d| d.metric(name)).map(|m| m.current_value);

        let row = NewRun {
            run_id: &invariant.run_id,
            timestamp: now,
            data_source,
            hallucination_rate: invariant.hallucination_rate,
            contradiction_rate: invariant.contradiction_rate,
            schema_validity_rate: invariant.schema_validity_rate,
            evidence_validity_rate: invariant.evidence_validity_rate,
            extraction_volume: drift_value(MetricName::ExtractionVolume),
            uncertainty_rate: drift_value(MetricName::UncertaintyRate),
            canary_f1: canary.map(|c| c.f1),
            canary_action: canary.map(|c| c.action.as_str()),
            alert_count: alerts.len() as i64,
            critical_count: critical_count as i64,
            full_report: &full_report,
        };

        self.with_conn(|conn| {
            let tx = conn.transaction().map_err(|e| to_storage_err(e.to_string()))?;
            runs::upsert_run(&tx, &row)?;
            for alert in &alerts {
                runs::insert_alert(&tx, &invariant.run_id, alert.level, &alert.message, now)?;
            }
            tx.commit().map_err(|e| to_storage_err(e.to_string()))
        })?;

        tracing::info!(
            run_id = %invariant.run_id,
            alerts = alerts.len(),
            critical = critical_count,
            "run saved"
        );
        Ok(invariant.run_id.clone())
    }

    /// Most recent runs first.
    pub fn recent_runs(&self, limit: usize) -> Result<Vec<RunRow>, StorageError> {
        self.with_conn(|conn| runs::query_recent(conn, limit))
    }

    /// `metric` over the last `days` days, oldest first.
    pub fn trend(&self, metric: TrendMetric, days: u32) -> Result<Vec<TrendPoint>, StorageError> {
        self.trend_at(metric, days, Utc::now())
    }

    pub fn trend_at(
        &self,
        metric: TrendMetric,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<TrendPoint>, StorageError> {
        let since = now - Duration::days(i64::from(days));
        self.with_conn(|conn| runs::query_trend(conn, metric, since))
    }

    /// Alert counts per level over the last `days` days.
    pub fn alert_summary(&self, days: u32) -> Result<BTreeMap<AlertLevel, usize>, StorageError> {
        self.alert_summary_at(days, Utc::now())
    }

    pub fn alert_summary_at(
        &self,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<BTreeMap<AlertLevel, usize>, StorageError> {
        let since = now - Duration::days(i64::from(days));
        let counts = self.with_conn(|conn| runs::alert_counts_since(conn, since))?;

        let mut summary = BTreeMap::new();
        for (severity, count) in counts {
            let level = match severity.as_str() {
                "CRITICAL" => AlertLevel::Critical,
                "WARNING" => AlertLevel::Warning,
                "INFO" => AlertLevel::Info,
                other => {
                    tracing::warn!(severity = other, "skipping alerts with unknown severity");
                    continue;
                }
            };
            summary.insert(level, count.max(0) as usize);
        }
        Ok(summary)
    }

    /// The full reports of a stored run.
    pub fn load_reports(&self, run_id: &str) -> Result<Option<StoredReports>, StorageError> {
        let raw = self.with_conn(|conn| runs::query_full_report(conn, run_id))?;
        raw.map(|json| {
            serde_json::from_str(&json).map_err(|e| StorageError::Serialization {
                message: e.to_string(),
            })
        })
        .transpose()
    }

    pub fn run_count(&self) -> Result<usize, StorageError> {
        self.with_conn(|conn| runs::count_runs(conn)).map(|n| n.max(0) as usize)
    }

    pub fn alert_count(&self, run_id: &str) -> Result<usize, StorageError> {
        self.with_conn(|conn| runs::count_alerts(conn, run_id))
            .map(|n| n.max(0) as usize)
    }
}
