//! Canary action policy as an ordered rule table. The first rule that
//! applies decides; the last rule always applies.

use ashwam_core::config::CanaryThresholds;
use ashwam_core::models::CanaryAction;

/// The measurements the policy decides on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanarySignals {
    pub f1: f64,
    pub evidence_match_rate: f64,
    /// Matched (parser, gold) pairs the evidence rate is computed over.
    pub matched_pairs: usize,
    /// Gold items across the whole canary set.
    pub gold_items: usize,
}

struct Rule {
    applies: fn(&CanarySignals, &CanaryThresholds) -> bool,
    action: CanaryAction,
    reason: fn(&CanarySignals, &CanaryThresholds) -> String,
}

const RULES: &[Rule] = &[
    Rule {
        applies: |s, _| s.gold_items == 0,
        action: CanaryAction::HumanReview,
        reason: |_, _| "canary set is empty; nothing to score against".to_string(),
    },
    // Evidence disagreement overrides any F1 verdict. With no pairs there is
    // nothing to disagree on and F1 is 0, so the F1 rules decide.
    Rule {
        applies: |s, t| s.matched_pairs > 0 && s.evidence_match_rate < t.min_evidence_match,
        action: CanaryAction::Rollback,
        reason: |s, t| {
            format!(
                "evidence match rate {:.1}% below {:.0}% (F1 {:.3}); spans no longer agree with gold",
                s.evidence_match_rate * 100.0,
                t.min_evidence_match * 100.0,
                s.f1
            )
        },
    },
    Rule {
        applies: |s, t| s.f1 >= t.f1_pass,
        action: CanaryAction::Pass,
        reason: |s, t| format!("F1 {:.3} meets pass threshold {:.2}", s.f1, t.f1_pass),
    },
    Rule {
        applies: |s, t| s.f1 >= t.f1_alert,
        action: CanaryAction::Alert,
        reason: |s, t| {
            format!("F1 {:.3} below pass threshold {:.2}; alert the on-call team", s.f1, t.f1_pass)
        },
    },
    Rule {
        applies: |s, t| s.f1 >= t.f1_human_review,
        action: CanaryAction::HumanReview,
        reason: |s, t| {
            format!("F1 {:.3} below {:.2}; sample outputs for human review", s.f1, t.f1_alert)
        },
    },
    Rule {
        applies: |s, t| s.f1 >= t.f1_rollback,
        action: CanaryAction::Rollback,
        reason: |s, t| {
            format!("F1 {:.3} below {:.2}; rollback-eligible", s.f1, t.f1_human_review)
        },
    },
    Rule {
        applies: |_, _| true,
        action: CanaryAction::Rollback,
        reason: |s, t| format!("F1 {:.3} below {:.2}; immediate rollback", s.f1, t.f1_rollback),
    },
];

/// Decide the action for a canary run, with a human-readable reason.
pub fn determine_action(signals: &CanarySignals, t: &CanaryThresholds) -> (CanaryAction, String) {
    RULES
        .iter()
        .find(|rule| (rule.applies)(signals, t))
        .map(|rule| (rule.action, (rule.reason)(signals, t)))
        .unwrap_or_else(|| (CanaryAction::Rollback, "no rule applied".to_string()))
}
