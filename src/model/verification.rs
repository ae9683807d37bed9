use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::claims::{Claim, Decomposition};
use super::evidence::{FactCheckRecord, Source};
use super::verdict::{ClassificationResult, VerdictCategory};

/// Longest input accepted by the pipeline, in characters
pub const MAX_INPUT_CHARS: usize = 5000;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VerifyRequest {
    pub text: String,
    /// Bypass the result cache for this request
    #[serde(default)]
    pub skip_cache: bool,
}

impl VerifyRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            skip_cache: false,
        }
    }
}

/// Guardrail rules that can rewrite a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GuardrailRule {
    DenialOfEstablishedFact,
    IntentMotivation,
    ValueJudgment,
    AncientHistoryCap,
    ReasoningSanitized,
}

/// Final verdict for one extracted claim
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClaimVerdict {
    pub claim: Claim,
    pub classification: ClassificationResult,
    pub guardrails_applied: Vec<GuardrailRule>,
    /// The autonomous-search path produced the final classification
    pub search_escalated: bool,
}

/// Complete, write-once outcome of a verification run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerificationResult {
    pub id: String,
    pub input: String,
    pub claims: Vec<ClaimVerdict>,
    pub decomposition: Decomposition,
    pub sources: Vec<Source>,
    pub fact_checks: Vec<FactCheckRecord>,
    pub overall_category: VerdictCategory,
    /// Confidence in [0, 100]
    pub overall_confidence: u8,
    pub summary: String,
    /// The run was degraded by the end-to-end deadline
    pub partial: bool,
    pub processing_time_ms: u64,
    pub verified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuickVerifyResult {
    pub category: VerdictCategory,
    pub confidence: u8,
    pub summary: String,
}
