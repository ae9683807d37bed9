//! Claim extraction
//!
//! Turns raw input into atomic declarative claims. Never fails: short input is
//! passed through, oracle failures fall back to the input itself.

mod prompts;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::model::extraction::RawClaims;
use crate::model::{Claim, ClaimType, PipelineConfig, clamp_unit};
use crate::service::oracle::{ClassificationOracle, OracleRequest};

/// Inputs shorter than this (in characters) are used verbatim as the only claim
const MIN_EXTRACT_CHARS: usize = 20;
const SHORT_INPUT_CONFIDENCE: f64 = 0.7;
const FALLBACK_CONFIDENCE: f64 = 0.5;
const FALLBACK_MAX_CHARS: usize = 500;
const FALLBACK_NOTE: &str =
    "Automatic claim extraction was unavailable, so the input is checked as a single claim.";
const TEMPERATURE: f64 = 0.2;
const MAX_TOKENS: u64 = 1024;

pub struct ExtractionService {
    oracle: Arc<dyn ClassificationOracle>,
    call_timeout: Duration,
    max_claims: usize,
}

impl ExtractionService {
    pub fn new(oracle: Arc<dyn ClassificationOracle>, pipeline: &PipelineConfig) -> Self {
        Self {
            oracle,
            call_timeout: pipeline.oracle_timeout(),
            max_claims: pipeline.max_claims.max(1),
        }
    }

    /// Extract at most `max_claims` claims from the input
    ///
    /// An empty list means the oracle found nothing check-worthy.
    pub async fn extract(&self, text: &str) -> Vec<Claim> {
        let text = text.trim();
        if text.chars().count() < MIN_EXTRACT_CHARS {
            return vec![claim(1, text.to_string(), ClaimType::Factual, SHORT_INPUT_CONFIDENCE, None)];
        }

        let request = OracleRequest {
            system_prompt: prompts::EXTRACTION_SYSTEM_PROMPT.to_string(),
            user_prompt: prompts::build_extraction_prompt(text),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        match tokio::time::timeout(self.call_timeout, self.oracle.extract_claims(&request)).await {
            Ok(Ok(raw)) => {
                let claims = self.validate_claims(raw);
                tracing::debug!(claims = claims.len(), "Extracted claims");
                claims
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Claim extraction failed, using input as the claim");
                vec![fallback_claim(text)]
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.call_timeout.as_secs(),
                    "Claim extraction timed out, using input as the claim"
                );
                vec![fallback_claim(text)]
            }
        }
    }

    fn validate_claims(&self, raw: RawClaims) -> Vec<Claim> {
        let mut seen = HashSet::new();
        raw.claims
            .into_iter()
            .map(|c| (c.text.trim().to_string(), c))
            .filter(|(text, _)| !text.is_empty() && seen.insert(text.to_lowercase()))
            .take(self.max_claims)
            .enumerate()
            .map(|(i, (text, c))| {
                claim(
                    i + 1,
                    text,
                    ClaimType::parse_or_default(&c.claim_type),
                    clamp_unit(c.confidence),
                    None,
                )
            })
            .collect()
    }
}

fn claim(n: usize, text: String, claim_type: ClaimType, confidence: f64, note: Option<String>) -> Claim {
    Claim {
        id: format!("claim-{n}"),
        text,
        claim_type,
        confidence,
        note,
    }
}

fn fallback_claim(text: &str) -> Claim {
    claim(
        1,
        text.chars().take(FALLBACK_MAX_CHARS).collect(),
        ClaimType::Factual,
        FALLBACK_CONFIDENCE,
        Some(FALLBACK_NOTE.to_string()),
    )
}
