//! Report writer: pretty JSON and markdown files in an output directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use ashwam_analytics::{available_audiences, create_renderer, NarrativeContext};
use ashwam_review::{QueueSummary, ReviewItem, ReviewQueue};

pub const INVARIANT_REPORT_FILE: &str = "invariant_report.json";
pub const DRIFT_REPORT_FILE: &str = "drift_report.json";
pub const CANARY_REPORT_FILE: &str = "canary_report.json";
pub const SUMMARY_FILE: &str = "summary.json";
pub const CONFIDENCE_REPORT_FILE: &str = "confidence_report.json";
pub const DIAGNOSIS_FILE: &str = "diagnosis.json";
pub const REVIEW_QUEUE_FILE: &str = "review_queue.json";

/// `review_queue.json` layout.
#[derive(Debug, Serialize)]
pub struct ReviewQueueExport<'a> {
    pub summary: QueueSummary,
    pub daily_batch: Vec<&'a ReviewItem>,
    pub critical: Vec<&'a ReviewItem>,
    pub items: &'a [ReviewItem],
}

impl<'a> ReviewQueueExport<'a> {
    pub fn new(queue: &'a ReviewQueue, now: DateTime<Utc>) -> Self {
        Self {
            summary: queue.summary_at(now),
            daily_batch: queue.daily_batch_at(now),
            critical: queue.critical_items(),
            items: queue.items(),
        }
    }
}

pub fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))
}

/// Serialize `value` as pretty JSON to `dir/file_name`.
pub fn write_json<T: Serialize + ?Sized>(
    dir: &Path,
    file_name: &str,
    value: &T,
) -> anyhow::Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(file_name);
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {file_name}"))?;
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "report written");
    Ok(path)
}

pub fn write_text(dir: &Path, file_name: &str, text: &str) -> anyhow::Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "narrative written");
    Ok(path)
}

pub fn write_review_queue(
    dir: &Path,
    queue: &ReviewQueue,
    now: DateTime<Utc>,
) -> anyhow::Result<PathBuf> {
    write_json(dir, REVIEW_QUEUE_FILE, &ReviewQueueExport::new(queue, now))
}

/// Render every audience view into `dir`.
pub fn write_narratives(dir: &Path, ctx: &NarrativeContext<'_>) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for audience in available_audiences() {
        let Some(renderer) = create_renderer(audience) else {
            continue;
        };
        written.push(write_text(dir, renderer.file_name(), &renderer.render(ctx))?);
    }
    Ok(written)
}
