//! Clinician review notes: one section per flagged extraction, with the
//! source context and the known limitations of the domain.
//! Journal ids are never printed.

use ashwam_core::models::{AlertLevel, Domain, ExtractedItem, Violation, ViolationType};

use super::{find_case_insensitive, NarrativeContext, NarrativeRenderer};

/// Characters of source text shown on either side of the evidence.
const CONTEXT_CHARS: usize = 20;
const LOW_CONFIDENCE: f64 = 0.7;

pub struct ClinicianNotes {
    pub max_items: usize,
}

impl Default for ClinicianNotes {
    fn default() -> Self {
        Self { max_items: 10 }
    }
}

impl ClinicianNotes {
    pub fn new(max_items: usize) -> Self {
        Self { max_items }
    }

    /// Evidence in its surrounding text, or a marker when it is not there.
    pub fn evidence_context(text: &str, span: &str) -> String {
        let Some((start, end)) = find_case_insensitive(text, span) else {
            return format!("[span not found in source: '{span}']");
        };
        let ctx_start = text[..start]
            .char_indices()
            .rev()
            .nth(CONTEXT_CHARS - 1)
            .map_or(0, |(i, _)| i);
        let ctx_end = text[end..]
            .char_indices()
            .nth(CONTEXT_CHARS)
            .map_or(text.len(), |(i, _)| end + i);

        let mut context = text[ctx_start..ctx_end].to_string();
        if ctx_start > 0 {
            context.insert_str(0, "...");
        }
        if ctx_end < text.len() {
            context.push_str("...");
        }
        context
    }

    pub fn limitations(item: &ExtractedItem) -> Vec<String> {
        let mut limitations = Vec::new();
        match item.domain {
            Domain::Emotion => limitations
                .push("emotion detection may miss sarcasm or complex expressions".to_string()),
            Domain::Symptom => limitations.push("negation detection accuracy is around 90%".to_string()),
            Domain::Mind => limitations
                .push("mind domain requires inference and may be less reliable".to_string()),
            Domain::Food => {}
        }
        if item.confidence < LOW_CONFIDENCE {
            limitations.push(format!(
                "low confidence ({:.0}%), review carefully",
                item.confidence * 100.0
            ));
        }
        limitations
    }

    fn flagged<'a>(ctx: &NarrativeContext<'a>) -> impl Iterator<Item = &'a Violation> {
        let invariant = ctx.invariant;
        invariant.violations.iter().filter(|v| {
            v.severity == AlertLevel::Critical && v.violation_type != ViolationType::SchemaError
        })
    }

    fn render_item(
        output: &mut String,
        number: usize,
        violation: &Violation,
        item: &ExtractedItem,
        text: Option<&str>,
    ) {
        output.push_str(&format!("## Extraction Review - [anonymized] #{number}\n\n"));

        output.push_str("### Decision\n");
        output.push_str(&format!("- **Extracted**: \"{}\"\n", item.evidence_span));
        output.push_str(&format!("- **Domain**: {}\n", item.domain));
        output.push_str(&format!("- **Polarity**: {}\n", item.polarity));
        output.push_str(&format!("- **Confidence**: {:.0}%\n\n", item.confidence * 100.0));

        output.push_str("### Evidence\n");
        let context = match text {
            Some(text) => Self::evidence_context(text, &item.evidence_span),
            None => "[source journal unavailable]".to_string(),
        };
        output.push_str(&format!("> {context}\n\n"));

        if violation.violation_type == ViolationType::PolarityConflict {
            output.push_str("### Conflict Detected\n");
            output.push_str(&format!("{}\n\n", violation.details));
        }

        output.push_str("### Limitations\n");
        let limitations = Self::limitations(item);
        if limitations.is_empty() {
            output.push_str("- none noted\n");
        }
        for limitation in limitations {
            output.push_str(&format!("- {limitation}\n"));
        }
        output.push('\n');
    }
}

impl NarrativeRenderer for ClinicianNotes {
    fn name(&self) -> &'static str {
        "clinician"
    }

    fn file_name(&self) -> &'static str {
        "clinician_view.md"
    }

    fn render(&self, ctx: &NarrativeContext<'_>) -> String {
        let mut output = String::new();
        let mut rendered = 0;

        for violation in Self::flagged(ctx) {
            if rendered == self.max_items {
                break;
            }
            let Some(item) = ctx.item(&violation.journal_id, violation.item_index) else {
                continue;
            };
            rendered += 1;
            let text = ctx.journals.get(&violation.journal_id).map(String::as_str);
            Self::render_item(&mut output, rendered, violation, item, text);
        }

        if rendered == 0 {
            output.push_str("## Extraction Review\n\nNo flagged extractions in this run.\n");
        }
        output
    }
}
