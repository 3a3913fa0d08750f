//! Evidence grounding: does a span actually occur in a source text?

use ashwam_core::constants::{MIN_PARTIAL_SPAN_CHARS, MIN_PARTIAL_SPAN_WORDS};

/// Whether `span` is grounded in `source`.
///
/// Case-insensitive containment of the trimmed span. Failing that, trailing
/// words are dropped one at a time (down to two words) and the first prefix
/// that occurs in the source and is longer than five characters is accepted,
/// so "no cramps today" grounds in a source that only says "no cramps".
///
/// Spans of five characters or fewer are never rescued by the prefix rule.
/// An empty span is a substring of any source; the schema check owns it.
pub fn evidence_exists(span: &str, source: &str) -> bool {
    let evidence = span.trim().to_lowercase();
    let text = source.to_lowercase();
    if text.contains(&evidence) {
        return true;
    }

    let words: Vec<&str> = evidence.split_whitespace().collect();
    (MIN_PARTIAL_SPAN_WORDS..=words.len()).rev().any(|n| {
        let partial = words[..n].join(" ");
        partial.chars().count() > MIN_PARTIAL_SPAN_CHARS && text.contains(&partial)
    })
}
