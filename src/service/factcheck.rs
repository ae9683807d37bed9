//! Fact-check registry client
//!
//! Looks up prior published verdicts through the Google Fact Check Tools API.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::FactCheckRecord;

const FACT_CHECK_API_BASE_URL: &str = "https://factchecktools.googleapis.com/v1alpha1";
const FACT_CHECK_BASE_URL_ENV: &str = "FACT_CHECK_BASE_URL";
const PAGE_SIZE: &str = "10";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FactCheckError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Fact-check request timed out")]
    Timeout,

    #[error("Rate limited")]
    RateLimited,

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Trait for fact-check registries
#[async_trait]
pub trait FactCheckProvider: Send + Sync {
    async fn search(&self, claim_text: &str) -> Result<Vec<FactCheckRecord>, FactCheckError>;
}

#[derive(Debug, Deserialize)]
struct ClaimSearchResponse {
    #[serde(default)]
    claims: Vec<ApiClaim>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiClaim {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    claim_review: Vec<ApiClaimReview>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiClaimReview {
    #[serde(default)]
    publisher: Option<ApiPublisher>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    review_date: Option<String>,
    #[serde(default)]
    textual_rating: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiPublisher {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    site: Option<String>,
}

/// Client for the Google Fact Check Tools claim search
pub struct GoogleFactCheckClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoogleFactCheckClient {
    pub fn new(api_key: &str, timeout: Duration) -> Self {
        let base_url =
            env::var(FACT_CHECK_BASE_URL_ENV).unwrap_or_else(|_| FACT_CHECK_API_BASE_URL.to_string());

        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to build fact-check HTTP client, using defaults");
            Client::new()
        });

        Self {
            client,
            base_url,
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl FactCheckProvider for GoogleFactCheckClient {
    async fn search(&self, claim_text: &str) -> Result<Vec<FactCheckRecord>, FactCheckError> {
        let url = format!("{}/claims:search", self.base_url);

        tracing::debug!(query_length = claim_text.len(), "Searching fact-check registry");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", claim_text),
                ("key", self.api_key.as_str()),
                ("languageCode", "en"),
                ("pageSize", PAGE_SIZE),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FactCheckError::Timeout
                } else {
                    FactCheckError::HttpError(e)
                }
            })?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Fact-check registry rate limited");
            return Err(FactCheckError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FactCheckError::ParseError(format!(
                "Unexpected status {}: {}",
                status, body
            )));
        }

        let parsed: ClaimSearchResponse = response.json().await.map_err(|e| {
            FactCheckError::ParseError(format!("Failed to deserialize claim search: {}", e))
        })?;

        let records = into_records(parsed);

        tracing::debug!(records = records.len(), "Fact-check lookup completed");

        Ok(records)
    }
}

/// Flatten claim reviews into records; reviews without a rating carry no verdict and are dropped
fn into_records(response: ClaimSearchResponse) -> Vec<FactCheckRecord> {
    response
        .claims
        .into_iter()
        .flat_map(|claim| {
            let claim_text = claim.text;
            claim.claim_review.into_iter().filter_map(move |review| {
                let verdict = review.textual_rating?.trim().to_string();
                if verdict.is_empty() {
                    return None;
                }
                let org = review
                    .publisher
                    .and_then(|p| p.name.or(p.site))
                    .unwrap_or_else(|| "Unknown publisher".to_string());
                Some(FactCheckRecord {
                    org,
                    verdict,
                    date: review.review_date.unwrap_or_default(),
                    url: review.url,
                    claim_reviewed: claim_text.clone(),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_reviews_are_flattened() {
        let json = r#"{
            "claims": [
                {
                    "text": "The Earth is flat",
                    "claimReview": [
                        {"publisher": {"name": "PolitiFact", "site": "politifact.com"},
                         "url": "https://www.politifact.com/x", "reviewDate": "2020-01-01T00:00:00Z",
                         "textualRating": "Pants on Fire"},
                        {"publisher": {"site": "snopes.com"}, "textualRating": "False"},
                        {"publisher": {"name": "NoRating"}}
                    ]
                },
                {"claimReview": []}
            ]
        }"#;
        let parsed: ClaimSearchResponse = serde_json::from_str(json).unwrap();
        let records = into_records(parsed);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].org, "PolitiFact");
        assert_eq!(records[0].verdict, "Pants on Fire");
        assert_eq!(records[0].claim_reviewed.as_deref(), Some("The Earth is flat"));
        assert_eq!(records[1].org, "snopes.com");
        assert_eq!(records[1].date, "");
        assert!(records[1].url.is_none());
    }

    #[test]
    fn test_empty_response() {
        let parsed: ClaimSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(into_records(parsed).is_empty());
    }
}
