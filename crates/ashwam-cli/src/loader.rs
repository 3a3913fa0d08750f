//! JSONL loading with per-line error collection.
//!
//! A file that cannot be read fails the command. A bad line is recorded as a
//! [`RecordError`] and the rest of the file still loads.

use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;

use ashwam_core::errors::{LoadError, RecordError, RecordErrorKind};
use ashwam_core::models::{ExtractionSnapshot, GoldLabel, Journal};

/// Valid records plus the lines that were rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome<T> {
    pub records: Vec<T>,
    pub errors: Vec<RecordError>,
}

impl<T> LoadOutcome<T> {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A JSONL record type. `check` runs after deserialization for constraints
/// serde cannot express.
pub trait Record: DeserializeOwned {
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Record for ExtractionSnapshot {
    fn check(&self) -> Result<(), String> {
        match self.items.iter().position(|item| !item.confidence_in_range()) {
            Some(idx) => Err(format!(
                "items[{idx}].confidence {} is outside [0, 1]",
                self.items[idx].confidence
            )),
            None => Ok(()),
        }
    }
}

impl Record for Journal {}

impl Record for GoldLabel {}

/// Parse JSONL text. Blank lines are skipped; line numbers are 1-based.
pub fn parse_jsonl<T: Record>(content: &str) -> LoadOutcome<T> {
    let mut records = Vec::new();
    let mut errors = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let value: serde_json::Value = match serde_json::from_str(trimmed) {
            Ok(v) => v,
            Err(e) => {
                errors.push(RecordError {
                    line: line_no,
                    kind: RecordErrorKind::BadJson,
                    details: e.to_string(),
                });
                continue;
            }
        };

        match serde_json::from_value::<T>(value) {
            Ok(record) => match record.check() {
                Ok(()) => records.push(record),
                Err(details) => errors.push(RecordError {
                    line: line_no,
                    kind: RecordErrorKind::ValidationFailed,
                    details,
                }),
            },
            Err(e) => errors.push(RecordError {
                line: line_no,
                kind: RecordErrorKind::ValidationFailed,
                details: e.to_string(),
            }),
        }
    }

    LoadOutcome { records, errors }
}

/// Read and parse a JSONL file.
pub fn load_jsonl<T: Record>(path: &Path) -> Result<LoadOutcome<T>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => LoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        },
    })?;

    let outcome = parse_jsonl(&content);
    if outcome.is_clean() {
        tracing::info!(path = %path.display(), records = outcome.records.len(), "loaded");
    } else {
        tracing::warn!(
            path = %path.display(),
            records = outcome.records.len(),
            errors = outcome.errors.len(),
            "loaded with rejected lines"
        );
        for err in &outcome.errors {
            tracing::debug!(path = %path.display(), line = err.line, kind = ?err.kind, details = %err.details, "rejected line");
        }
    }
    Ok(outcome)
}
