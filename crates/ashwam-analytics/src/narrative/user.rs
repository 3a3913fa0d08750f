//! User-facing summary: plain, non-alarming wording per journal.
//!
//! Items with a critical violation are withheld; when anything was withheld
//! or is low confidence the user is asked to confirm.

use std::collections::HashSet;

use ashwam_core::models::{AlertLevel, Domain, ExtractedItem, ExtractionSnapshot, Polarity};

use super::{NarrativeContext, NarrativeRenderer};

const LOW_CONFIDENCE: f64 = 0.7;

pub struct UserSummary {
    /// Items listed per journal.
    pub max_items: usize,
}

impl Default for UserSummary {
    fn default() -> Self {
        Self { max_items: 5 }
    }
}

impl UserSummary {
    pub fn summary_line(items: &[&ExtractedItem]) -> String {
        if items.is_empty() {
            return "Nothing specific noted from your journal today.".to_string();
        }
        let has = |d: Domain| items.iter().any(|i| i.domain == d);
        let mut parts = Vec::new();
        if has(Domain::Symptom) {
            parts.push("some health notes");
        }
        if has(Domain::Emotion) {
            parts.push("how you were feeling");
        }
        if has(Domain::Food) {
            parts.push("what you ate");
        }
        if has(Domain::Mind) {
            parts.push("what was on your mind");
        }
        format!("From your journal, we noticed {}.", parts.join(", "))
    }

    pub fn describe(item: &ExtractedItem) -> String {
        let span = &item.evidence_span;
        if item.polarity == Polarity::Absent {
            return format!("No {} mentioned ✓", span.to_lowercase());
        }
        match item.domain {
            Domain::Symptom => format!("You mentioned: {span}"),
            Domain::Emotion => format!("Feeling: {span}"),
            Domain::Food => format!("Food: {span}"),
            Domain::Mind => format!("Mental state: {span}"),
        }
    }

    fn render_journal(
        &self,
        output: &mut String,
        snapshot: &ExtractionSnapshot,
        withheld: &HashSet<(&str, usize)>,
    ) {
        let shown: Vec<&ExtractedItem> = snapshot
            .items
            .iter()
            .enumerate()
            .filter(|(i, _)| !withheld.contains(&(snapshot.journal_id.as_str(), *i)))
            .map(|(_, item)| item)
            .collect();
        let needs_confirmation = shown.len() < snapshot.items.len()
            || shown.iter().any(|i| i.confidence < LOW_CONFIDENCE);

        output.push_str(&format!("### What We Noticed ({})\n\n", snapshot.journal_id));
        output.push_str(&format!("{}\n\n", Self::summary_line(&shown)));
        for item in shown.iter().take(self.max_items) {
            output.push_str(&format!("- {}\n", Self::describe(item)));
        }
        if !shown.is_empty() {
            output.push('\n');
        }
        if needs_confirmation {
            output.push_str("**Does this look right?** You can edit your journal anytime.\n\n");
        }
    }
}

impl NarrativeRenderer for UserSummary {
    fn name(&self) -> &'static str {
        "user"
    }

    fn file_name(&self) -> &'static str {
        "user_view.md"
    }

    fn render(&self, ctx: &NarrativeContext<'_>) -> String {
        let withheld: HashSet<(&str, usize)> = ctx
            .invariant
            .violations
            .iter()
            .filter(|v| v.severity == AlertLevel::Critical)
            .map(|v| (v.journal_id.as_str(), v.item_index))
            .collect();

        let mut output = String::new();
        for snapshot in ctx.snapshots {
            self.render_journal(&mut output, snapshot, &withheld);
        }
        if output.is_empty() {
            output.push_str("### What We Noticed\n\nNothing specific noted from your journal today.\n");
        }
        output
    }
}
