//! Web search provider client
//!
//! Backed by the Brave Search API. News, academic and government variants are
//! built by composing a `site:` filter onto the query.

use std::env;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use crate::model::SearchHit;
use crate::model::config::MAX_RESULTS_PER_QUERY;

const BRAVE_API_BASE_URL: &str = "https://api.search.brave.com/res/v1";
const BRAVE_BASE_URL_ENV: &str = "BRAVE_SEARCH_BASE_URL";

const NEWS_SITES: &[&str] = &[
    "reuters.com",
    "apnews.com",
    "bbc.com",
    "npr.org",
    "theguardian.com",
    "nytimes.com",
    "washingtonpost.com",
];

const ACADEMIC_SITES: &[&str] = &["edu", "ac.uk", "nature.com", "science.org", "ncbi.nlm.nih.gov"];

const GOVERNMENT_SITES: &[&str] = &["gov", "europa.eu", "who.int", "un.org"];

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));").unwrap());

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Search request timed out")]
    Timeout,

    #[error("Rate limited")]
    RateLimited,

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Which slice of the web a search targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Web,
    News,
    Academic,
    Government,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Web => "web",
            SearchKind::News => "news",
            SearchKind::Academic => "academic",
            SearchKind::Government => "government",
        }
    }

    fn sites(&self) -> &'static [&'static str] {
        match self {
            SearchKind::Web => &[],
            SearchKind::News => NEWS_SITES,
            SearchKind::Academic => ACADEMIC_SITES,
            SearchKind::Government => GOVERNMENT_SITES,
        }
    }
}

/// Compose a provider query for the given search variant
pub fn compose_query(query: &str, kind: SearchKind) -> String {
    let sites = kind.sites();
    if sites.is_empty() {
        return query.to_string();
    }
    let filter = sites
        .iter()
        .map(|s| format!("site:{s}"))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("{query} ({filter})")
}

/// Trait for web search providers
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search for `query`, returning at most `count` hits (capped at 10)
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchHit>, SearchError>;

    /// Search a specific variant of the web
    async fn search_kind(
        &self,
        query: &str,
        kind: SearchKind,
        count: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        self.search(&compose_query(query, kind), count).await
    }
}

#[derive(Debug, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWebResults>,
}

#[derive(Debug, Deserialize)]
struct BraveWebResults {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    description: String,
}

/// Client for the Brave Search API
pub struct BraveSearchClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BraveSearchClient {
    /// Create a new search client
    ///
    /// The base URL is resolved from `BRAVE_SEARCH_BASE_URL`, falling back to the
    /// public API. `timeout` bounds every request.
    pub fn new(api_key: &str, timeout: Duration) -> Self {
        let base_url = env::var(BRAVE_BASE_URL_ENV).unwrap_or_else(|_| BRAVE_API_BASE_URL.to_string());

        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to build search HTTP client, using defaults");
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
impl SearchProvider for BraveSearchClient {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchHit>, SearchError> {
        let count = count.clamp(1, MAX_RESULTS_PER_QUERY);
        let url = format!("{}/web/search", self.base_url);

        tracing::debug!(query = %query, count = count, "Searching the web");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .query(&[("q", query), ("count", &count.to_string())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout
                } else {
                    SearchError::HttpError(e)
                }
            })?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Search provider rate limited");
            return Err(SearchError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ParseError(format!(
                "Unexpected status {}: {}",
                status, body
            )));
        }

        let parsed: BraveResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(format!("Failed to deserialize results: {}", e)))?;

        let hits: Vec<SearchHit> = parsed
            .web
            .map(|w| w.results)
            .unwrap_or_default()
            .into_iter()
            .take(count)
            .map(|r| SearchHit {
                title: strip_html(&r.title),
                url: r.url,
                snippet: strip_html(&r.description),
            })
            .collect();

        tracing::debug!(query = %query, hits = hits.len(), "Search completed");

        Ok(hits)
    }
}

fn strip_html(text: &str) -> String {
    decode_entities(&HTML_TAG.replace_all(text, "")).trim().to_string()
}

/// Decode numeric entities and the common named ones; `&amp;` goes last
fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY.replace_all(text, |caps: &regex::Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    numeric
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
