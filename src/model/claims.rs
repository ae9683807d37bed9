//! Claims and semantic components extracted from user input

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::verdict::VerdictCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Factual,
    Opinion,
    Prediction,
}

impl ClaimType {
    /// Parse a provider-supplied claim type, defaulting to `Factual`
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "opinion" => ClaimType::Opinion,
            "prediction" => ClaimType::Prediction,
            _ => ClaimType::Factual,
        }
    }
}

/// An atomic statement considered for fact-checking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Claim {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub claim_type: ClaimType,
    pub confidence: f64,
    /// Set when the claim was produced by a fallback path rather than the oracle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    VerifiableFact,
    ValueJudgment,
    Prediction,
    Presupposition,
}

impl ComponentType {
    /// Parse a provider-supplied component type, defaulting to `VerifiableFact`
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "value_judgment" | "value_judgement" | "opinion" => ComponentType::ValueJudgment,
            "prediction" => ComponentType::Prediction,
            "presupposition" | "assumption" => ComponentType::Presupposition,
            _ => ComponentType::VerifiableFact,
        }
    }
}

/// A semantic fragment of the raw input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimComponent {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    /// Verifiability in [0, 1]
    pub verifiability_score: f64,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<VerdictCategory>,
}

/// Per-type counts over a decomposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecompositionSummary {
    pub total_components: usize,
    pub verifiable_facts: usize,
    pub value_judgments: usize,
    pub predictions: usize,
    pub presuppositions: usize,
    /// Mean verifiability score in [0, 1]; 0 when there are no components
    pub overall_verifiability: f64,
}

impl DecompositionSummary {
    pub fn from_components(components: &[ClaimComponent]) -> Self {
        let count = |t: ComponentType| {
            components
                .iter()
                .filter(|c| c.component_type == t)
                .count()
        };

        let overall_verifiability = if components.is_empty() {
            0.0
        } else {
            let total: f64 = components.iter().map(|c| c.verifiability_score).sum();
            (total / components.len() as f64).clamp(0.0, 1.0)
        };

        Self {
            total_components: components.len(),
            verifiable_facts: count(ComponentType::VerifiableFact),
            value_judgments: count(ComponentType::ValueJudgment),
            predictions: count(ComponentType::Prediction),
            presuppositions: count(ComponentType::Presupposition),
            overall_verifiability,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Decomposition {
    pub components: Vec<ClaimComponent>,
    pub summary: DecompositionSummary,
}

impl Decomposition {
    pub fn new(components: Vec<ClaimComponent>) -> Self {
        let summary = DecompositionSummary::from_components(&components);
        Self {
            components,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(component_type: ComponentType, score: f64) -> ClaimComponent {
        ClaimComponent {
            id: "c".to_string(),
            text: "text".to_string(),
            component_type,
            verifiability_score: score,
            explanation: String::new(),
            verdict: None,
        }
    }

    #[test]
    fn test_summary_counts_sum_to_total() {
        let components = vec![
            component(ComponentType::VerifiableFact, 0.9),
            component(ComponentType::ValueJudgment, 0.1),
            component(ComponentType::Prediction, 0.3),
            component(ComponentType::Presupposition, 0.6),
            component(ComponentType::VerifiableFact, 0.8),
        ];
        let summary = DecompositionSummary::from_components(&components);

        assert_eq!(summary.total_components, 5);
        assert_eq!(
            summary.verifiable_facts
                + summary.value_judgments
                + summary.predictions
                + summary.presuppositions,
            summary.total_components
        );
        assert!((summary.overall_verifiability - 0.54).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let summary = DecompositionSummary::from_components(&[]);
        assert_eq!(summary.total_components, 0);
        assert_eq!(summary.overall_verifiability, 0.0);
    }

    #[test]
    fn test_component_type_defaults_to_verifiable_fact() {
        assert_eq!(
            ComponentType::parse_or_default("Value Judgment"),
            ComponentType::ValueJudgment
        );
        assert_eq!(
            ComponentType::parse_or_default("assumption"),
            ComponentType::Presupposition
        );
        assert_eq!(
            ComponentType::parse_or_default("rhetorical_question"),
            ComponentType::VerifiableFact
        );
    }

    #[test]
    fn test_claim_type_defaults_to_factual() {
        assert_eq!(ClaimType::parse_or_default("Prediction"), ClaimType::Prediction);
        assert_eq!(ClaimType::parse_or_default("hypothesis"), ClaimType::Factual);
    }
}
