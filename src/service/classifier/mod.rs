//! Evidence-grounded claim classification
//!
//! Wraps the oracle with retry, an autonomous-search escalation path, output
//! validation and a deterministic fallback. `classify` always returns a
//! classification.

mod prompts;

use std::sync::Arc;
use std::time::Duration;

use crate::model::extraction::RawClassification;
use crate::model::{ClassificationResult, FactCheckRecord, PipelineConfig, Source, VerdictCategory, clamp_unit};
use crate::service::aggregation::{count_verdict_families, dedup_fact_checks};
use crate::service::guardrails::value_judgment_keyword;
use crate::service::oracle::{ClassificationOracle, OracleError, OracleRequest};

const VALUE_JUDGMENT_TEMPERATURE: f64 = 0.1;
const DEFAULT_TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u64 = 1024;
/// Keeps the exponential backoff shift well inside `u32`
const MAX_ATTEMPTS: u32 = 10;

/// Below this, a likely_false or partially_verified answer is re-checked by search
const ESCALATION_CONFIDENCE: f64 = 0.6;
/// Words shorter than this are ignored when checking source relevance
const MIN_KEY_TERM_CHARS: usize = 5;

const FALLBACK_FALSE_CONFIDENCE: f64 = 0.7;
const FALLBACK_CONFIDENCE: f64 = 0.3;
const FALLBACK_FALSE_REASONING: &str =
    "Multiple independent fact-checking organisations have rated this claim false.";
const FALLBACK_REASONING: &str =
    "Automated classification was unavailable for this claim. It should be reviewed manually.";

/// Per-call switches set by the orchestrator
#[derive(Debug, Clone, Copy)]
pub struct ClassifyOptions {
    /// Permit the autonomous-search path
    pub allow_search: bool,
    pub max_searches: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationOutcome {
    pub result: ClassificationResult,
    /// The autonomous-search path produced `result`
    pub search_escalated: bool,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Grounded,
    Search(usize),
}

pub struct ClassificationService {
    oracle: Arc<dyn ClassificationOracle>,
    max_attempts: u32,
    initial_backoff: Duration,
    call_timeout: Duration,
}

impl ClassificationService {
    pub fn new(oracle: Arc<dyn ClassificationOracle>, pipeline: &PipelineConfig) -> Self {
        Self {
            oracle,
            max_attempts: pipeline.max_attempts.clamp(1, MAX_ATTEMPTS),
            initial_backoff: Duration::from_millis(pipeline.initial_backoff_ms),
            call_timeout: pipeline.oracle_timeout(),
        }
    }

    /// Classify one claim against the gathered evidence
    pub async fn classify(
        &self,
        claim_text: &str,
        sources: &[Source],
        fact_checks: &[FactCheckRecord],
        options: ClassifyOptions,
    ) -> ClassificationOutcome {
        let request = build_request(claim_text, sources, fact_checks);

        if sources.is_empty() && fact_checks.is_empty() && options.allow_search {
            tracing::debug!(claim = %claim_text, "No evidence, using autonomous search");
            return match self
                .call_with_retry(&request, Mode::Search(options.max_searches), self.max_attempts)
                .await
            {
                Ok(result) => ClassificationOutcome {
                    result,
                    search_escalated: true,
                },
                Err(e) => self.fallback(claim_text, fact_checks, &e),
            };
        }

        let grounded = match self
            .call_with_retry(&request, Mode::Grounded, self.max_attempts)
            .await
        {
            Ok(result) => result,
            Err(e) => return self.fallback(claim_text, fact_checks, &e),
        };

        if options.allow_search && needs_escalation(claim_text, &grounded, sources) {
            tracing::info!(
                claim = %claim_text,
                category = %grounded.category,
                confidence = grounded.confidence,
                "Escalating classification to autonomous search"
            );

            // escalation is a second opinion, so a single attempt
            match self
                .call_with_retry(&request, Mode::Search(options.max_searches), 1)
                .await
            {
                Ok(searched) if prefer_search_result(&grounded, &searched) => {
                    tracing::info!(
                        from = %grounded.category,
                        to = %searched.category,
                        confidence = searched.confidence,
                        "Search escalation result preferred"
                    );
                    return ClassificationOutcome {
                        result: searched,
                        search_escalated: true,
                    };
                }
                Ok(searched) => {
                    tracing::debug!(
                        category = %searched.category,
                        confidence = searched.confidence,
                        "Search escalation result discarded"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Search escalation failed, keeping grounded result");
                }
            }
        }

        ClassificationOutcome {
            result: grounded,
            search_escalated: false,
        }
    }

    async fn call_with_retry(
        &self,
        request: &OracleRequest,
        mode: Mode,
        attempts: u32,
    ) -> Result<ClassificationResult, OracleError> {
        let mut attempt = 0;
        loop {
            let call = async {
                match mode {
                    Mode::Grounded => self.oracle.classify(request).await,
                    Mode::Search(max_searches) => {
                        self.oracle.classify_with_search(request, max_searches).await
                    }
                }
            };

            let outcome = tokio::time::timeout(self.call_timeout, call)
                .await
                .unwrap_or(Err(OracleError::Timeout));

            match outcome {
                Ok(raw) => {
                    if attempt > 0 {
                        tracing::info!(
                            mode = ?mode,
                            attempt = attempt,
                            "Classification succeeded after retry"
                        );
                    }
                    return Ok(validate(raw));
                }
                Err(e) if e.is_retryable() && attempt + 1 < attempts => {
                    let delay = self.initial_backoff * (1 << attempt); // Exponential backoff
                    tracing::warn!(
                        mode = ?mode,
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "Classification failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn fallback(
        &self,
        claim_text: &str,
        fact_checks: &[FactCheckRecord],
        error: &OracleError,
    ) -> ClassificationOutcome {
        let result = consensus_fallback(fact_checks).unwrap_or_else(|| {
            ClassificationResult::new(
                VerdictCategory::PartiallyVerified,
                FALLBACK_CONFIDENCE,
                FALLBACK_REASONING,
            )
        });

        tracing::error!(
            claim = %claim_text,
            error = %error,
            fallback_category = %result.category,
            "Classification failed, using fallback"
        );

        ClassificationOutcome {
            result,
            search_escalated: false,
        }
    }
}

/// `confirmed_false` when at least two distinct fact-checks rate the claim false
pub(crate) fn consensus_fallback(fact_checks: &[FactCheckRecord]) -> Option<ClassificationResult> {
    let (false_count, _) = count_verdict_families(&dedup_fact_checks(fact_checks.to_vec()));
    (false_count >= 2).then(|| {
        ClassificationResult::new(
            VerdictCategory::ConfirmedFalse,
            FALLBACK_FALSE_CONFIDENCE,
            FALLBACK_FALSE_REASONING,
        )
    })
}

fn build_request(claim_text: &str, sources: &[Source], fact_checks: &[FactCheckRecord]) -> OracleRequest {
    let temperature = if value_judgment_keyword(claim_text).is_some() {
        VALUE_JUDGMENT_TEMPERATURE
    } else {
        DEFAULT_TEMPERATURE
    };

    OracleRequest {
        system_prompt: prompts::CLASSIFICATION_SYSTEM_PROMPT.to_string(),
        user_prompt: prompts::build_classification_prompt(claim_text, sources, fact_checks),
        temperature,
        max_tokens: MAX_TOKENS,
    }
}

/// Coerce raw oracle output into the closed category set and unit range
fn validate(raw: RawClassification) -> ClassificationResult {
    let category = VerdictCategory::parse_or_default(&raw.category);
    if category.as_str() != raw.category.trim().to_lowercase() {
        tracing::debug!(raw_category = %raw.category, category = %category, "Normalized oracle category");
    }
    ClassificationResult::new(category, clamp_unit(raw.confidence), raw.reasoning)
}

fn needs_escalation(claim_text: &str, grounded: &ClassificationResult, sources: &[Source]) -> bool {
    let weak = matches!(
        grounded.category,
        VerdictCategory::LikelyFalse | VerdictCategory::PartiallyVerified
    ) && grounded.confidence < ESCALATION_CONFIDENCE;

    weak || (!sources.is_empty() && !sources_mention_claim(claim_text, sources))
}

/// Whether any source's title or snippet shares a key term with the claim
fn sources_mention_claim(claim_text: &str, sources: &[Source]) -> bool {
    let terms: Vec<String> = claim_text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= MIN_KEY_TERM_CHARS)
        .map(str::to_lowercase)
        .collect();

    if terms.is_empty() {
        return true;
    }

    sources.iter().any(|source| {
        let text = format!(
            "{} {}",
            source.title.as_deref().unwrap_or_default(),
            source.snippet.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        terms.iter().any(|t| text.contains(t.as_str()))
    })
}

fn prefer_search_result(grounded: &ClassificationResult, searched: &ClassificationResult) -> bool {
    let reverses_likely_false = grounded.category == VerdictCategory::LikelyFalse
        && !matches!(
            searched.category,
            VerdictCategory::LikelyFalse | VerdictCategory::ConfirmedFalse
        );
    searched.confidence > grounded.confidence || reverses_likely_false
}
