//! Printable sheet for human reviewers with decision checkboxes.

use super::{pct, truncate_chars, NarrativeContext, NarrativeRenderer};

const EXCERPT_CHARS: usize = 200;

pub struct ReviewSheet {
    pub max_items: usize,
}

impl Default for ReviewSheet {
    fn default() -> Self {
        Self { max_items: 20 }
    }
}

impl NarrativeRenderer for ReviewSheet {
    fn name(&self) -> &'static str {
        "review_sheet"
    }

    fn file_name(&self) -> &'static str {
        "review_sheet.md"
    }

    fn render(&self, ctx: &NarrativeContext<'_>) -> String {
        let inv = ctx.invariant;
        let mut output = String::new();

        output.push_str(&format!(
            "# Human Review Queue - {}\n\n",
            ctx.generated_at.format("%Y-%m-%d")
        ));
        output.push_str(&format!("**Total items for review:** {}\n", inv.violations.len()));
        output.push_str(&format!("**Hallucination rate:** {}\n", pct(inv.hallucination_rate)));
        output.push_str(&format!("**Contradiction rate:** {}\n\n", pct(inv.contradiction_rate)));
        output.push_str("---\n\n");

        for (i, violation) in inv.violations.iter().take(self.max_items).enumerate() {
            let excerpt = ctx
                .journals
                .get(&violation.journal_id)
                .map(|text| truncate_chars(text, EXCERPT_CHARS))
                .unwrap_or_else(|| "[journal not found]".to_string());

            output.push_str(&format!(
                "## Item {}: {} - {}\n\n",
                i + 1,
                violation.journal_id,
                violation.violation_type
            ));
            output.push_str(&format!("**Severity:** {}\n\n", violation.severity));
            output.push_str("**Journal excerpt:**\n");
            output.push_str(&format!("> {excerpt}\n\n"));
            output.push_str(&format!("**Issue:** {}\n\n", violation.details));
            output.push_str("**Review decision:**\n");
            output.push_str("- [ ] ✅ Approve (false positive, extraction is valid)\n");
            output.push_str("- [ ] ❌ Reject (true positive, extraction is wrong)\n");
            output.push_str("- [ ] ⚠️ Unclear (needs escalation)\n\n");
            output.push_str("**Notes:**\n```\n\n```\n\n---\n\n");
        }

        if inv.violations.len() > self.max_items {
            output.push_str(&format!(
                "_{} more items not shown._\n\n",
                inv.violations.len() - self.max_items
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str("| Approved | Rejected | Unclear |\n");
        output.push_str("|----------|----------|---------|\n");
        output.push_str("|          |          |         |\n\n");
        output.push_str("**Reviewer signature:** _________________\n\n");
        output.push_str("**Date reviewed:** _________________\n");
        output
    }
}
