//! Classification oracle boundary
//!
//! The oracle is an external, non-deterministic text classifier. Everything it
//! returns is raw (`model::extraction`) and must be validated by the caller.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::model::extraction::{RawClaims, RawClassification, RawDecomposition};

mod openai;
mod search_tool;

pub use openai::OpenAiOracle;

static STATUS_5XX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b5\d{2}\b").unwrap());
static STATUS_4XX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b4\d{2}\b").unwrap());

/// One oracle invocation
#[derive(Debug, Clone)]
pub struct OracleRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f64,
    pub max_tokens: u64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum OracleError {
    #[error("Oracle call timed out")]
    Timeout,

    #[error("Oracle rate limited: {0}")]
    RateLimited(String),

    #[error("Oracle server error: {0}")]
    Server(String),

    #[error("Oracle rejected the request: {0}")]
    Client(String),

    #[error("Oracle transport error: {0}")]
    Transport(String),

    #[error("Oracle returned malformed output: {0}")]
    Malformed(String),
}

impl OracleError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OracleError::Timeout
                | OracleError::RateLimited(_)
                | OracleError::Server(_)
                | OracleError::Transport(_)
        )
    }

    /// Classify a provider error message by the status information it carries
    pub fn from_provider_message(message: String) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("timed out") || lower.contains("timeout") {
            OracleError::Timeout
        } else if lower.contains("429") || lower.contains("rate limit") || lower.contains("too many requests") {
            OracleError::RateLimited(message)
        } else if STATUS_5XX.is_match(&lower) || lower.contains("overloaded") {
            OracleError::Server(message)
        } else if STATUS_4XX.is_match(&lower) {
            OracleError::Client(message)
        } else if lower.contains("deserializ") || lower.contains("no data") {
            OracleError::Malformed(message)
        } else {
            OracleError::Transport(message)
        }
    }
}

/// External probabilistic classification capability
#[async_trait]
pub trait ClassificationOracle: Send + Sync {
    /// Evidence-grounded structured classification
    async fn classify(&self, request: &OracleRequest) -> Result<RawClassification, OracleError>;

    /// Classification where the oracle may run up to `max_searches` searches itself
    async fn classify_with_search(
        &self,
        request: &OracleRequest,
        max_searches: usize,
    ) -> Result<RawClassification, OracleError>;

    async fn decompose(&self, request: &OracleRequest) -> Result<RawDecomposition, OracleError>;

    async fn extract_claims(&self, request: &OracleRequest) -> Result<RawClaims, OracleError>;
}

/// Parse a classification object out of free-form model output
///
/// Agents answer in prose; the JSON object is taken from the first `{` to the
/// last `}`.
pub fn parse_classification_text(text: &str) -> Result<RawClassification, OracleError> {
    let start = text.find('{');
    let end = text.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if e > s => &text[s..=e],
        _ => {
            return Err(OracleError::Malformed(format!(
                "no JSON object in response: '{}'",
                text.chars().take(100).collect::<String>()
            )));
        }
    };
    serde_json::from_str(json).map_err(|e| OracleError::Malformed(e.to_string()))
}
