//! Workspace-wide constants that are not user-configurable.

/// Spans of this many characters or fewer are only ever matched in full.
pub const MIN_PARTIAL_SPAN_CHARS: usize = 5;

/// Word-truncated prefixes stop at this many words.
pub const MIN_PARTIAL_SPAN_WORDS: usize = 2;

/// Items below this confidence count toward the uncertainty rate.
pub const LOW_CONFIDENCE_CUTOFF: f64 = 0.5;

/// Floor applied to every category probability before computing JSD.
pub const JSD_EPSILON: f64 = 1e-10;

/// Confidence assumed for a review item when the originating extraction
/// cannot be located.
pub const DEFAULT_REVIEW_CONFIDENCE: f64 = 0.5;

/// Confidence level used for Wilson intervals in reports.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Length of the random hex suffix on run identifiers.
pub const RUN_ID_SUFFIX_LEN: usize = 6;

/// Length of the random hex suffix on review item identifiers.
pub const REVIEW_ID_SUFFIX_LEN: usize = 8;

/// Environment variable read for the tracing filter.
pub const LOG_ENV_VAR: &str = "ASHWAM_LOG";

/// Default tracing filter when `ASHWAM_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "ashwam=info";

/// Config file looked up in the data directory.
pub const PROJECT_CONFIG_FILE: &str = "ashwam.toml";
