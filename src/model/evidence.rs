//! Evidence gathered from search and fact-check providers

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Domain class of a source URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Government,
    Academic,
    Scientific,
    NewsWire,
    MajorNews,
    FactChecker,
    Nonprofit,
    Commercial,
    SocialMedia,
    Unknown,
}

/// Result of evaluating a URL's trustworthiness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SourceEvaluation {
    /// Trust score in [0, 100]
    pub reliability_score: u8,
    pub source_type: SourceType,
    pub factors: Vec<String>,
}

/// A raw search hit as returned by a search provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// An evaluated piece of evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Source {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub reliability: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// A third party's published verdict on a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FactCheckRecord {
    pub org: String,
    pub verdict: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_reviewed: Option<String>,
}
