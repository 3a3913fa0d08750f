//! Narratives: markdown renderings of one run for a specific audience.
//!
//! 4 audiences: PM dashboard, clinician review notes, user-facing summary,
//! human review sheet. Renderers only read the reports; they never change a
//! status or a number.

pub mod clinician;
pub mod pm;
pub mod review_sheet;
pub mod user;

use chrono::{DateTime, Utc};

use ashwam_core::models::{
    CanaryReport, DriftReport, ExtractedItem, ExtractionSnapshot, InvariantReport, JournalIndex,
};

/// Everything a renderer may read.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeContext<'a> {
    pub invariant: &'a InvariantReport,
    pub drift: Option<&'a DriftReport>,
    pub canary: Option<&'a CanaryReport>,
    pub snapshots: &'a [ExtractionSnapshot],
    pub journals: &'a JournalIndex,
    pub generated_at: DateTime<Utc>,
}

impl<'a> NarrativeContext<'a> {
    pub fn new(
        invariant: &'a InvariantReport,
        snapshots: &'a [ExtractionSnapshot],
        journals: &'a JournalIndex,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            invariant,
            drift: None,
            canary: None,
            snapshots,
            journals,
            generated_at,
        }
    }

    pub fn with_drift(mut self, drift: &'a DriftReport) -> Self {
        self.drift = Some(drift);
        self
    }

    pub fn with_canary(mut self, canary: &'a CanaryReport) -> Self {
        self.canary = Some(canary);
        self
    }

    /// The extracted item a violation points at, if it still exists.
    pub fn item(&self, journal_id: &str, item_index: usize) -> Option<&'a ExtractedItem> {
        self.snapshots
            .iter()
            .find(|s| s.journal_id == journal_id)
            .and_then(|s| s.items.get(item_index))
    }
}

/// Trait for narrative generation.
pub trait NarrativeRenderer: Send + Sync {
    fn name(&self) -> &'static str;
    /// File the CLI writes the rendering to.
    fn file_name(&self) -> &'static str;
    fn render(&self, ctx: &NarrativeContext<'_>) -> String;
}

/// Create a renderer by audience name.
pub fn create_renderer(audience: &str) -> Option<Box<dyn NarrativeRenderer>> {
    match audience {
        "pm" => Some(Box::new(pm::PmDashboard)),
        "clinician" => Some(Box::new(clinician::ClinicianNotes::default())),
        "user" => Some(Box::new(user::UserSummary::default())),
        "review_sheet" => Some(Box::new(review_sheet::ReviewSheet::default())),
        _ => None,
    }
}

/// List all available audience names.
pub fn available_audiences() -> &'static [&'static str] {
    &["pm", "clinician", "user", "review_sheet"]
}

/// Byte range of the first case-insensitive occurrence of `needle`.
pub(crate) fn find_case_insensitive(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() {
        return None;
    }
    haystack.char_indices().find_map(|(start, _)| {
        let mut rest = haystack[start..].char_indices();
        for n in &needle {
            let (_, h) = rest.next()?;
            if !h.to_lowercase().eq(n.to_lowercase()) {
                return None;
            }
        }
        let end = rest.next().map_or(haystack.len(), |(i, _)| start + i);
        Some((start, end))
    })
}

/// At most `max_chars` characters of `text`, with `...` when cut.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

pub(crate) fn pct(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_audience_has_a_renderer() {
        for audience in available_audiences() {
            let renderer = create_renderer(audience).expect(audience);
            assert_eq!(renderer.name(), *audience);
            assert!(renderer.file_name().ends_with(".md"));
        }
        assert!(create_renderer("html").is_none());
    }

    #[test]
    fn case_insensitive_find_returns_original_offsets() {
        let text = "Woke up with a HEADACHE again";
        let (start, end) = find_case_insensitive(text, "headache").unwrap();
        assert_eq!(&text[start..end], "HEADACHE");
        assert_eq!(find_case_insensitive(text, "nausea"), None);
        assert_eq!(find_case_insensitive(text, ""), None);
    }

    #[test]
    fn find_handles_multibyte_text() {
        let text = "café très bon, pain";
        let (start, end) = find_case_insensitive(text, "PAIN").unwrap();
        assert_eq!(&text[start..end], "pain");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé...");
        assert_eq!(truncate_chars("short", 10), "short");
    }
}
