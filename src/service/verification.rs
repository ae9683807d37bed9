//! Verification orchestrator
//!
//! Runs one pipeline per request: evidence gathering, decomposition and
//! extraction concurrently, then per-claim classification with guardrails, then
//! aggregation. Only invalid input is reported as an error; everything else
//! degrades into the result.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::time::Instant;

use crate::model::{
    Claim, ClaimVerdict, ClassificationResult, ComponentType, Decomposition, FactCheckRecord,
    MAX_INPUT_CHARS, PipelineConfig, QuickVerifyResult, Source, SourceFilterConfig,
    VerdictCategory, VerificationResult, VerifyRequest,
};
use crate::service::aggregation::aggregate;
use crate::service::cache::{CacheError, VerificationCache};
use crate::service::cache_keys::normalize_claim_text;
use crate::service::classifier::{ClassificationService, ClassifyOptions, consensus_fallback};
use crate::service::decomposer::DecompositionService;
use crate::service::evidence::{Evidence, EvidenceService};
use crate::service::extractor::ExtractionService;
use crate::service::factcheck::FactCheckProvider;
use crate::service::guardrails::{apply_guardrails, apply_guardrails_with_audit};
use crate::service::oracle::ClassificationOracle;
use crate::service::search::SearchProvider;

const DEADLINE_CONFIDENCE: f64 = 0.3;
const DEADLINE_REASONING: &str =
    "Classification did not finish within the time limit. The claim should be reviewed manually.";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum VerificationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub struct VerificationService {
    evidence: EvidenceService,
    decomposer: DecompositionService,
    extractor: ExtractionService,
    classifier: ClassificationService,
    cache: Option<VerificationCache>,
    pipeline: PipelineConfig,
}

impl VerificationService {
    pub fn new(
        oracle: Arc<dyn ClassificationOracle>,
        search: Arc<dyn SearchProvider>,
        fact_checks: Arc<dyn FactCheckProvider>,
        sources: SourceFilterConfig,
        pipeline: PipelineConfig,
        cache: Option<VerificationCache>,
    ) -> Self {
        Self {
            evidence: EvidenceService::new(search, fact_checks, sources, &pipeline),
            decomposer: DecompositionService::new(Arc::clone(&oracle), &pipeline),
            extractor: ExtractionService::new(Arc::clone(&oracle), &pipeline),
            classifier: ClassificationService::new(oracle, &pipeline),
            cache,
            pipeline,
        }
    }

    /// Run the full pipeline for one request
    pub async fn verify(&self, request: &VerifyRequest) -> Result<VerificationResult, VerificationError> {
        let text = validate_input(&request.text)?;

        if !request.skip_cache
            && let Some(cache) = &self.cache
            && let Some(cached) = cache.get(text).await
        {
            tracing::info!(id = %cached.id, "Returning cached verification");
            return Ok(cached);
        }

        let started = Instant::now();
        let deadline = started + self.pipeline.deadline();
        let mut partial = false;

        let extended = self.pipeline.extended_search
            && self.pipeline.deadline() > self.pipeline.escalation_reserve();

        let (evidence, decomposition, claims) = tokio::join!(
            tokio::time::timeout_at(deadline, self.evidence.gather(text, extended)),
            self.decomposer.decompose(text),
            self.extractor.extract(text),
        );

        let evidence = evidence.unwrap_or_else(|_| {
            tracing::warn!("Evidence gathering hit the deadline, continuing without evidence");
            partial = true;
            Evidence::default()
        });

        let remaining = deadline.saturating_duration_since(Instant::now());
        let allow_search = remaining > self.pipeline.escalation_reserve();
        if !allow_search {
            tracing::warn!(
                remaining_ms = remaining.as_millis(),
                "Near deadline, search escalation disabled"
            );
            partial = true;
        }

        let options = ClassifyOptions {
            allow_search,
            max_searches: self.pipeline.max_autonomous_searches,
        };

        let verdicts: Vec<(ClaimVerdict, bool)> = join_all(
            claims
                .into_iter()
                .map(|claim| self.classify_claim(claim, &evidence, options, deadline)),
        )
        .await;
        partial |= verdicts.iter().any(|(_, timed_out)| *timed_out);
        let claims: Vec<ClaimVerdict> = verdicts.into_iter().map(|(v, _)| v).collect();

        let classifications: Vec<ClassificationResult> =
            claims.iter().map(|c| c.classification.clone()).collect();
        let overall = aggregate(&classifications, &evidence.fact_checks);

        let decomposition = annotate_components(decomposition, &claims);
        let summary = build_summary(
            overall.category,
            &claims,
            &evidence.sources,
            &evidence.fact_checks,
            &decomposition,
            partial,
        );

        let result = VerificationResult {
            id: uuid::Uuid::new_v4().to_string(),
            input: text.to_string(),
            claims,
            decomposition,
            sources: evidence.sources,
            fact_checks: evidence.fact_checks,
            overall_category: overall.category,
            overall_confidence: overall.confidence,
            summary,
            partial,
            processing_time_ms: started.elapsed().as_millis() as u64,
            verified_at: chrono::Utc::now(),
        };

        tracing::info!(
            id = %result.id,
            category = %result.overall_category,
            confidence = result.overall_confidence,
            claims = result.claims.len(),
            partial = result.partial,
            elapsed_ms = result.processing_time_ms,
            "Verification completed"
        );

        // partial results are not worth serving again
        if !result.partial
            && let Some(cache) = &self.cache
        {
            cache.set(text, &result).await;
        }

        Ok(result)
    }

    /// Fact-check lookup plus a single classification, without web search
    pub async fn quick_verify(&self, text: &str) -> Result<QuickVerifyResult, VerificationError> {
        let text = validate_input(text)?;

        let fact_checks = self.evidence.lookup_fact_checks(text).await;
        let outcome = self
            .classifier
            .classify(
                text,
                &[],
                &fact_checks,
                ClassifyOptions {
                    allow_search: false,
                    max_searches: 0,
                },
            )
            .await;
        let classification = apply_guardrails(text, outcome.result);

        let overall = aggregate(std::slice::from_ref(&classification), &fact_checks);

        let mut summary = format!(
            "{} with {}% confidence, based on {} published fact-check{}.",
            overall.category.label(),
            overall.confidence,
            fact_checks.len(),
            plural(fact_checks.len())
        );
        if overall.category == classification.category {
            summary.push(' ');
            summary.push_str(&classification.reasoning);
        }

        tracing::info!(
            category = %overall.category,
            confidence = overall.confidence,
            fact_checks = fact_checks.len(),
            "Quick verification completed"
        );

        Ok(QuickVerifyResult {
            category: overall.category,
            confidence: overall.confidence,
            summary,
        })
    }

    /// Drop all cached verifications; returns the number removed
    pub async fn clear_cache(&self) -> Result<usize, CacheError> {
        match &self.cache {
            Some(cache) => cache.clear().await,
            None => Ok(0),
        }
    }

    /// `None` when caching is disabled
    pub async fn cache_healthy(&self) -> Option<bool> {
        match &self.cache {
            Some(cache) => Some(cache.is_healthy().await),
            None => None,
        }
    }

    /// Classify and audit one claim; the flag reports a deadline timeout
    async fn classify_claim(
        &self,
        claim: Claim,
        evidence: &Evidence,
        options: ClassifyOptions,
        deadline: Instant,
    ) -> (ClaimVerdict, bool) {
        let classification = self.classifier.classify(
            &claim.text,
            &evidence.sources,
            &evidence.fact_checks,
            options,
        );

        let outcome = tokio::time::timeout_at(deadline, classification).await;
        match outcome {
            Ok(outcome) => self.finish_claim(claim, outcome.result, outcome.search_escalated, false),
            Err(_) => {
                tracing::warn!(claim_id = %claim.id, "Classification hit the deadline");
                let result = consensus_fallback(&evidence.fact_checks).unwrap_or_else(|| {
                    ClassificationResult::new(
                        VerdictCategory::PartiallyVerified,
                        DEADLINE_CONFIDENCE,
                        DEADLINE_REASONING,
                    )
                });
                self.finish_claim(claim, result, false, true)
            }
        }
    }

    fn finish_claim(
        &self,
        claim: Claim,
        result: ClassificationResult,
        search_escalated: bool,
        timed_out: bool,
    ) -> (ClaimVerdict, bool) {
        let (classification, guardrails_applied) = apply_guardrails_with_audit(&claim.text, result);

        tracing::debug!(
            claim_id = %claim.id,
            category = %classification.category,
            confidence = classification.confidence,
            guardrails = guardrails_applied.len(),
            search_escalated = search_escalated,
            "Claim classified"
        );

        (
            ClaimVerdict {
                claim,
                classification,
                guardrails_applied,
                search_escalated,
            },
            timed_out,
        )
    }
}

/// Trimmed, non-empty, bounded input
fn validate_input(text: &str) -> Result<&str, VerificationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(VerificationError::InvalidInput("text must not be empty".to_string()));
    }
    let chars = text.chars().count();
    if chars > MAX_INPUT_CHARS {
        return Err(VerificationError::InvalidInput(format!(
            "text is {chars} characters, the limit is {MAX_INPUT_CHARS}"
        )));
    }
    Ok(text)
}

/// Attach claim verdicts to components that state the same thing
fn annotate_components(mut decomposition: Decomposition, claims: &[ClaimVerdict]) -> Decomposition {
    let by_text: HashMap<String, VerdictCategory> = claims
        .iter()
        .map(|c| (normalize_claim_text(&c.claim.text), c.classification.category))
        .collect();

    for component in &mut decomposition.components {
        if let Some(category) = by_text.get(&normalize_claim_text(&component.text)) {
            component.verdict = Some(*category);
        }
    }
    decomposition
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn build_summary(
    category: VerdictCategory,
    claims: &[ClaimVerdict],
    sources: &[Source],
    fact_checks: &[FactCheckRecord],
    decomposition: &Decomposition,
    partial: bool,
) -> String {
    let mut summary = format!(
        "{}: {} claim{} checked against {} source{} and {} published fact-check{}.",
        category.label(),
        claims.len(),
        plural(claims.len()),
        sources.len(),
        plural(sources.len()),
        fact_checks.len(),
        plural(fact_checks.len())
    );

    let has = |t: ComponentType| decomposition.components.iter().any(|c| c.component_type == t);
    if has(ComponentType::ValueJudgment) {
        summary.push_str(" The text contains value judgments, which cannot be verified as fact.");
    }
    if has(ComponentType::Prediction) {
        summary.push_str(" It also makes predictions that cannot be verified yet.");
    }
    if partial {
        summary.push_str(" Some checks were skipped to stay within the time limit.");
    }
    summary
}
