//! Claim decomposition
//!
//! Splits raw input into typed semantic components. Never fails: short input,
//! oracle errors and empty output all degrade to a single trivial component.

mod prompts;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::model::extraction::RawDecomposition;
use crate::model::{ClaimComponent, ComponentType, Decomposition, PipelineConfig, clamp_unit};
use crate::service::oracle::{ClassificationOracle, OracleRequest};

/// Inputs shorter than this (in characters) are not sent to the oracle
const MIN_DECOMPOSE_CHARS: usize = 15;
const TRIVIAL_VERIFIABILITY: f64 = 0.5;
const TEMPERATURE: f64 = 0.2;
const MAX_TOKENS: u64 = 1500;

pub struct DecompositionService {
    oracle: Arc<dyn ClassificationOracle>,
    call_timeout: Duration,
}

impl DecompositionService {
    pub fn new(oracle: Arc<dyn ClassificationOracle>, pipeline: &PipelineConfig) -> Self {
        Self {
            oracle,
            call_timeout: pipeline.oracle_timeout(),
        }
    }

    pub async fn decompose(&self, text: &str) -> Decomposition {
        let text = text.trim();
        if text.chars().count() < MIN_DECOMPOSE_CHARS {
            return trivial(text, "Input is too short to decompose and is treated as a single statement.");
        }

        let request = OracleRequest {
            system_prompt: prompts::DECOMPOSITION_SYSTEM_PROMPT.to_string(),
            user_prompt: prompts::build_decomposition_prompt(text),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let raw = match tokio::time::timeout(self.call_timeout, self.oracle.decompose(&request)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Decomposition failed, using trivial decomposition");
                return trivial(text, "Decomposition was unavailable; the input is treated as a single statement.");
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.call_timeout.as_secs(),
                    "Decomposition timed out, using trivial decomposition"
                );
                return trivial(text, "Decomposition was unavailable; the input is treated as a single statement.");
            }
        };

        let components = validate_components(raw);
        if components.is_empty() {
            tracing::debug!("Oracle returned no usable components");
            return trivial(text, "No distinct components were found; the input is treated as a single statement.");
        }

        let decomposition = Decomposition::new(components);
        tracing::debug!(
            total = decomposition.summary.total_components,
            verifiable = decomposition.summary.verifiable_facts,
            "Decomposed input"
        );
        decomposition
    }
}

fn trivial(text: &str, explanation: &str) -> Decomposition {
    Decomposition::new(vec![ClaimComponent {
        id: "c1".to_string(),
        text: text.to_string(),
        component_type: ComponentType::VerifiableFact,
        verifiability_score: TRIVIAL_VERIFIABILITY,
        explanation: explanation.to_string(),
        verdict: None,
    }])
}

/// Drop empty components, clamp scores, default types and fill in ids
fn validate_components(raw: RawDecomposition) -> Vec<ClaimComponent> {
    let mut seen_ids = HashSet::new();

    raw.components
        .into_iter()
        .filter(|c| !c.text.trim().is_empty())
        .enumerate()
        .map(|(i, c)| {
            let id = c
                .id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty() && !seen_ids.contains(id))
                .unwrap_or_else(|| format!("c{}", i + 1));
            seen_ids.insert(id.clone());

            ClaimComponent {
                id,
                text: c.text.trim().to_string(),
                component_type: ComponentType::parse_or_default(&c.component_type),
                verifiability_score: clamp_unit(c.verifiability_score),
                explanation: c.explanation.trim().to_string(),
                verdict: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::oracle::OracleError;
    use crate::service::testing::StubOracle;

    fn service(oracle: &Arc<StubOracle>) -> DecompositionService {
        DecompositionService::new(oracle.clone(), &PipelineConfig::default())
    }

    #[tokio::test]
    async fn test_short_input_skips_oracle() {
        let oracle = Arc::new(StubOracle::classifying("opinion", 0.5));
        let decomposition = service(&oracle).decompose("  Cats purr.  ").await;

        assert_eq!(oracle.decompose_calls(), 0);
        assert_eq!(decomposition.components.len(), 1);
        assert_eq!(decomposition.components[0].text, "Cats purr.");
        assert_eq!(decomposition.components[0].verifiability_score, 0.5);
        assert_eq!(decomposition.summary.verifiable_facts, 1);
    }

    #[tokio::test]
    async fn test_oracle_failure_degrades_to_trivial() {
        let oracle = Arc::new(
            StubOracle::classifying("opinion", 0.5)
                .failing_decomposition(OracleError::Server("500".to_string())),
        );
        let decomposition = service(&oracle)
            .decompose("Was the air strike necessary?")
            .await;

        assert_eq!(oracle.decompose_calls(), 1);
        assert_eq!(decomposition.components.len(), 1);
        assert_eq!(decomposition.components[0].component_type, ComponentType::VerifiableFact);
    }

    #[tokio::test]
    async fn test_components_are_validated() {
        let oracle = Arc::new(StubOracle::classifying("opinion", 0.5).with_components(&[
            ("The strike had a military target", "presupposition", 0.6),
            ("   ", "verifiable_fact", 0.9),
            ("The air strike was necessary", "Value Judgment", -0.3),
            ("Something odd", "mystery", 4.0),
        ]));
        let decomposition = service(&oracle)
            .decompose("Was the air strike necessary?")
            .await;

        let components = &decomposition.components;
        assert_eq!(components.len(), 3);
        assert_eq!(components[0].component_type, ComponentType::Presupposition);
        assert_eq!(components[1].component_type, ComponentType::ValueJudgment);
        assert_eq!(components[1].verifiability_score, 0.0);
        assert_eq!(components[2].component_type, ComponentType::VerifiableFact);
        assert_eq!(components[2].verifiability_score, 1.0);

        let ids: HashSet<_> = components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 3);

        let s = &decomposition.summary;
        assert_eq!(
            s.verifiable_facts + s.value_judgments + s.predictions + s.presuppositions,
            s.total_components
        );
        assert!((0.0..=1.0).contains(&s.overall_verifiability));
    }

    #[test]
    fn test_duplicate_ids_are_replaced() {
        let raw = RawDecomposition {
            components: ["first", "second"]
                .iter()
                .map(|t| crate::model::extraction::RawComponent {
                    id: Some("x".to_string()),
                    text: t.to_string(),
                    component_type: "prediction".to_string(),
                    verifiability_score: 0.5,
                    explanation: String::new(),
                })
                .collect(),
        };
        let components = validate_components(raw);
        assert_eq!(components[0].id, "x");
        assert_eq!(components[1].id, "c2");
    }

    #[tokio::test]
    async fn test_empty_oracle_output_degrades_to_trivial() {
        let oracle = Arc::new(StubOracle::classifying("opinion", 0.5));
        let decomposition = service(&oracle)
            .decompose("Unemployment fell to 3.5% last year")
            .await;

        assert_eq!(oracle.decompose_calls(), 1);
        assert_eq!(decomposition.summary.total_components, 1);
    }
}
