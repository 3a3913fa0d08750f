use std::fmt;

use serde::{Deserialize, Serialize};

use super::enums::AlertLevel;

/// Which invariant a violation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvariantName {
    SchemaValidity,
    Hallucination,
    Contradiction,
}

/// Machine-readable violation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    SchemaError,
    EvidenceNotFound,
    PolarityConflict,
}

impl ViolationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchemaError => "schema_error",
            Self::EvidenceNotFound => "evidence_not_found",
            Self::PolarityConflict => "polarity_conflict",
        }
    }
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed invariant for one item. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub journal_id: String,
    pub item_index: usize,
    pub invariant_name: InvariantName,
    pub violation_type: ViolationType,
    pub details: String,
    pub severity: AlertLevel,
    /// Evidence span of the offending item, for review routing.
    #[serde(default)]
    pub evidence_span: String,
}
