//! Deterministic post-classification corrections
//!
//! Rules run in a fixed order over the claim text and the oracle's result:
//! denial of established fact, intent/motivation, value judgment, ancient
//! historicity, then reasoning sanitization. Applying them twice yields the same
//! result as applying them once.

mod patterns;
mod sanitize;

pub use patterns::value_judgment_keyword;

use crate::model::{ClassificationResult, GuardrailRule, VerdictCategory};

const DENIAL_CONFIDENCE: f64 = 0.99;
const DENIAL_MIN_CONFIDENCE: f64 = 0.95;
const INTENT_MAX_CONFIDENCE: f64 = 0.5;
const ANCIENT_MAX_CONFIDENCE: f64 = 0.75;

const INTENT_EXPLANATION: &str = "This claim concerns what someone intended, meant or drew inspiration from. \
    Intent and motivation cannot be verified directly; only observable actions and statements can. \
    Interpretations of intent remain opinion.";

const ANCIENT_CAVEAT: &str = "Evidence about ancient figures and events is necessarily indirect, \
    resting on later texts, archaeology and scholarly inference.";

/// Apply every guardrail rule to a classification
pub fn apply_guardrails(claim_text: &str, result: ClassificationResult) -> ClassificationResult {
    apply_guardrails_with_audit(claim_text, result).0
}

/// Apply every guardrail rule, also returning the rules that changed the result
pub fn apply_guardrails_with_audit(
    claim_text: &str,
    mut result: ClassificationResult,
) -> (ClassificationResult, Vec<GuardrailRule>) {
    let mut applied = Vec::new();

    if let Some(topic) = patterns::match_denial(claim_text)
        && (result.category != VerdictCategory::ConfirmedFalse
            || result.confidence < DENIAL_MIN_CONFIDENCE)
    {
        tracing::warn!(
            topic = topic.topic,
            original_category = %result.category,
            original_confidence = result.confidence,
            "Guardrail override: denial of established fact"
        );
        result = ClassificationResult::new(
            VerdictCategory::ConfirmedFalse,
            DENIAL_CONFIDENCE,
            topic.explanation,
        );
        applied.push(GuardrailRule::DenialOfEstablishedFact);
    }

    if result.category.is_affirmative() && patterns::has_intent_language(claim_text) {
        tracing::warn!(
            original_category = %result.category,
            original_confidence = result.confidence,
            "Guardrail override: intent or motivation claim"
        );
        result = ClassificationResult::new(
            VerdictCategory::Opinion,
            result.confidence.min(INTENT_MAX_CONFIDENCE),
            INTENT_EXPLANATION,
        );
        applied.push(GuardrailRule::IntentMotivation);
    }

    if result.category.is_affirmative()
        && let Some(keyword) = patterns::value_judgment_keyword(claim_text)
    {
        tracing::warn!(
            keyword = %keyword,
            original_category = %result.category,
            "Guardrail override: value judgment"
        );
        let reasoning = format!(
            "This is a value judgment: whether something is \"{keyword}\" depends on values and perspective, \
             not on facts alone. {}",
            result.reasoning
        );
        result = ClassificationResult::new(VerdictCategory::Opinion, result.confidence, reasoning);
        applied.push(GuardrailRule::ValueJudgment);
    }

    if patterns::is_ancient_historicity_claim(claim_text) {
        let needs_cap = result.confidence > ANCIENT_MAX_CONFIDENCE;
        let needs_caveat = !result.reasoning.contains("indirect");
        if needs_cap || needs_caveat {
            tracing::debug!(
                original_confidence = result.confidence,
                "Guardrail: capping ancient historicity claim"
            );
            if needs_cap {
                result.confidence = ANCIENT_MAX_CONFIDENCE;
            }
            if needs_caveat {
                result.reasoning = format!("{} {}", result.reasoning.trim_end(), ANCIENT_CAVEAT);
            }
            applied.push(GuardrailRule::AncientHistoryCap);
        }
    }

    let sanitized = sanitize::sanitize_reasoning(&result.reasoning);
    if sanitized != result.reasoning {
        tracing::debug!("Guardrail: removed meta-commentary from reasoning");
        result.reasoning = sanitized;
        applied.push(GuardrailRule::ReasoningSanitized);
    }

    (result, applied)
}
