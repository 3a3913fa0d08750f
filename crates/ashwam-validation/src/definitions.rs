//! Audit catalogue: what each invariant checks and what happens when it fails.

use ashwam_core::config::InvariantThresholds;
use ashwam_core::models::InvariantDefinition;

fn definition(
    name: &str,
    description: &str,
    why_exists: &str,
    risk_mitigated: &str,
    failure_action: &str,
    threshold: f64,
) -> InvariantDefinition {
    InvariantDefinition {
        name: name.to_string(),
        description: description.to_string(),
        why_exists: why_exists.to_string(),
        risk_mitigated: risk_mitigated.to_string(),
        failure_action: failure_action.to_string(),
        threshold,
    }
}

/// The four invariant definitions, carrying the thresholds actually in force.
pub fn invariant_definitions(thresholds: &InvariantThresholds) -> Vec<InvariantDefinition> {
    vec![
        definition(
            "schema_validity",
            "share of items whose fields satisfy the per-domain schema",
            "downstream features consume extractor output directly; malformed items break them",
            "app crashes, corrupted health records, broken integrations",
            "below threshold: block the batch and alert engineering",
            thresholds.min_schema_validity,
        ),
        definition(
            "evidence_validity",
            "share of items whose evidence span occurs in the source journal",
            "every extraction must be grounded in the user's own words",
            "false health signals, misguided self-care, loss of trust",
            "below threshold: queue for clinician review and investigate the model",
            thresholds.min_evidence_validity,
        ),
        definition(
            "hallucination_rate",
            "share of items whose evidence span is NOT found in the source journal",
            "direct measure of fabricated content; an invented symptom causes alarm",
            "health anxiety, incorrect tracking, potential clinical harm",
            "above threshold: escalate to clinical review and block the batch",
            thresholds.max_hallucination_rate,
        ),
        definition(
            "contradiction_rate",
            "contradiction groups (same span, conflicting polarity) per item",
            "telling a user a symptom is both present and absent destroys trust",
            "user confusion, wrong health decisions, liability",
            "any contradiction: flag every member for human review",
            thresholds.max_contradiction_rate,
        ),
    ]
}
