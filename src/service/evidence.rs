//! Evidence gathering
//!
//! Fans out to the search variants and the fact-check registry concurrently,
//! then filters, evaluates, deduplicates and ranks what comes back. Provider
//! failures and timeouts only shrink the evidence set.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use url::Url;

use crate::model::{FactCheckRecord, PipelineConfig, SearchHit, Source, SourceFilterConfig};
use crate::service::aggregation::{dedup_fact_checks, dedup_sources};
use crate::service::factcheck::FactCheckProvider;
use crate::service::reliability;
use crate::service::search::{SearchKind, SearchProvider};

/// Longest query sent to the providers, in characters
const MAX_QUERY_CHARS: usize = 300;

const BASE_KINDS: &[SearchKind] = &[SearchKind::Web, SearchKind::News];
const EXTENDED_KINDS: &[SearchKind] = &[
    SearchKind::Web,
    SearchKind::News,
    SearchKind::Academic,
    SearchKind::Government,
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evidence {
    /// Deduplicated, most reliable first
    pub sources: Vec<Source>,
    pub fact_checks: Vec<FactCheckRecord>,
}

pub struct EvidenceService {
    search: Arc<dyn SearchProvider>,
    fact_checks: Arc<dyn FactCheckProvider>,
    filter: SourceFilterConfig,
    call_timeout: Duration,
    results_per_query: usize,
}

impl EvidenceService {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        fact_checks: Arc<dyn FactCheckProvider>,
        filter: SourceFilterConfig,
        pipeline: &PipelineConfig,
    ) -> Self {
        Self {
            search,
            fact_checks,
            filter,
            call_timeout: pipeline.provider_timeout(),
            results_per_query: pipeline.results_per_query(),
        }
    }

    /// Gather sources and fact-checks for `text`
    ///
    /// `extended` adds the academic and government search variants.
    pub async fn gather(&self, text: &str, extended: bool) -> Evidence {
        let query = search_query(text);
        let kinds = if extended { EXTENDED_KINDS } else { BASE_KINDS };

        let searches = join_all(kinds.iter().map(|kind| self.search_kind(&query, *kind)));
        let (hits, fact_checks) = tokio::join!(searches, self.lookup_fact_checks(&query));

        let hits: Vec<SearchHit> = hits.into_iter().flatten().collect();
        let sources = self.build_sources(hits, &fact_checks);

        tracing::info!(
            searches = kinds.len(),
            sources = sources.len(),
            fact_checks = fact_checks.len(),
            "Evidence gathered"
        );

        Evidence {
            sources,
            fact_checks,
        }
    }

    /// Look up published fact-checks; failures yield an empty list
    pub async fn lookup_fact_checks(&self, text: &str) -> Vec<FactCheckRecord> {
        match tokio::time::timeout(self.call_timeout, self.fact_checks.search(text)).await {
            Ok(Ok(records)) => dedup_fact_checks(records),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Fact-check lookup failed");
                Vec::new()
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.call_timeout.as_secs(),
                    "Fact-check lookup timed out"
                );
                Vec::new()
            }
        }
    }

    async fn search_kind(&self, query: &str, kind: SearchKind) -> Vec<SearchHit> {
        let call = self.search.search_kind(query, kind, self.results_per_query);
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(hits)) => {
                tracing::debug!(kind = kind.as_str(), hits = hits.len(), "Search completed");
                hits
            }
            Ok(Err(e)) => {
                tracing::warn!(kind = kind.as_str(), error = %e, "Search failed");
                Vec::new()
            }
            Err(_) => {
                tracing::warn!(
                    kind = kind.as_str(),
                    timeout_secs = self.call_timeout.as_secs(),
                    "Search timed out"
                );
                Vec::new()
            }
        }
    }

    fn build_sources(&self, hits: Vec<SearchHit>, fact_checks: &[FactCheckRecord]) -> Vec<Source> {
        let from_hits = hits
            .into_iter()
            .filter_map(|hit| self.to_source(&hit.url, non_empty(hit.title), non_empty(hit.snippet)));

        // published fact-checks are evidence in their own right
        let from_fact_checks = fact_checks.iter().filter_map(|fc| {
            let url = fc.url.as_deref()?;
            self.to_source(
                url,
                Some(format!("{}: {}", fc.org, fc.verdict)),
                fc.claim_reviewed.clone(),
            )
        });

        let mut sources = dedup_sources(from_hits.chain(from_fact_checks).collect());
        sources.sort_by(|a, b| b.reliability.cmp(&a.reliability));
        sources
    }

    fn to_source(&self, url: &str, title: Option<String>, snippet: Option<String>) -> Option<Source> {
        let parsed = Url::parse(url).ok()?;
        if !self.filter.is_url_allowed(&parsed) {
            tracing::debug!(url = %url, "Source filtered by configuration");
            return None;
        }

        let evaluation = reliability::evaluate(url);
        Some(Source {
            name: reliability::source_name(url),
            url: url.to_string(),
            source_type: evaluation.source_type,
            reliability: evaluation.reliability_score,
            title,
            snippet,
        })
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Collapse whitespace and cut the text to a provider-friendly query
fn search_query(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_QUERY_CHARS {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(MAX_QUERY_CHARS).collect();
    match cut.rfind(' ') {
        Some(i) => cut[..i].to_string(),
        None => cut,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceType;
    use crate::service::testing::{StubFactCheck, StubSearch, fact_check, hit};

    fn service(search: &Arc<StubSearch>, fact_checks: &Arc<StubFactCheck>, filter: SourceFilterConfig) -> EvidenceService {
        EvidenceService::new(search.clone(), fact_checks.clone(), filter, &PipelineConfig::default())
    }

    fn hits() -> Vec<SearchHit> {
        vec![
            hit("https://randomblog.example.com/post", "Blog", "A post"),
            hit("https://www.reuters.com/world/article", "Reuters report", "Wire copy"),
            hit("https://www.reuters.com/world/article/", "Duplicate", "Same page"),
            hit("https://www.cdc.gov/page", "CDC", ""),
            hit("not a url", "Broken", "Broken"),
        ]
    }

    #[tokio::test]
    async fn test_sources_are_deduplicated_and_ranked() {
        let search = Arc::new(StubSearch::with_hits(hits()));
        let fact_checks = Arc::new(StubFactCheck::with_records(vec![]));
        let evidence = service(&search, &fact_checks, SourceFilterConfig::default())
            .gather("Some claim", false)
            .await;

        // two search variants return the same hits
        assert_eq!(search.call_count(), 2);
        let urls: Vec<_> = evidence.sources.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls.len(), 3);
        assert!(
            evidence
                .sources
                .windows(2)
                .all(|w| w[0].reliability >= w[1].reliability)
        );
        let cdc = evidence.sources.iter().find(|s| s.name == "cdc.gov").unwrap();
        assert_eq!(cdc.source_type, SourceType::Government);
        assert_eq!(cdc.snippet, None);
    }

    #[tokio::test]
    async fn test_extended_search_queries_more_variants() {
        let search = Arc::new(StubSearch::with_hits(vec![]));
        let fact_checks = Arc::new(StubFactCheck::with_records(vec![]));
        service(&search, &fact_checks, SourceFilterConfig::default())
            .gather("Some claim", true)
            .await;

        assert_eq!(search.call_count(), 4);
        let queries = search.queries();
        assert!(queries.iter().any(|q| q.contains("site:gov")));
        assert!(queries.iter().any(|q| q.contains("site:nature.com")));
    }

    #[tokio::test]
    async fn test_filter_and_fact_check_sources() {
        let search = Arc::new(StubSearch::with_hits(hits()));
        let fact_checks = Arc::new(StubFactCheck::with_records(vec![
            fact_check("PolitiFact", "False"),
            fact_check("PolitiFact", "False"),
        ]));
        let filter = SourceFilterConfig {
            allow: vec![],
            deny: vec!["randomblog".to_string()],
        };
        let evidence = service(&search, &fact_checks, filter)
            .gather("Some claim", false)
            .await;

        assert_eq!(evidence.fact_checks.len(), 1);
        assert!(evidence.sources.iter().all(|s| !s.url.contains("randomblog")));
        let fc_source = evidence
            .sources
            .iter()
            .find(|s| s.url.contains("politifact"))
            .unwrap();
        assert_eq!(fc_source.title.as_deref(), Some("PolitiFact: False"));
    }

    #[tokio::test]
    async fn test_provider_failures_yield_empty_evidence() {
        let search = Arc::new(StubSearch::failing());
        let fact_checks = Arc::new(StubFactCheck::failing());
        let evidence = service(&search, &fact_checks, SourceFilterConfig::default())
            .gather("Some claim", false)
            .await;

        assert_eq!(evidence, Evidence::default());
        assert_eq!(fact_checks.call_count(), 1);
    }

    #[test]
    fn test_search_query_is_bounded() {
        assert_eq!(search_query("  a \n b  "), "a b");
        let long = "word ".repeat(100);
        let query = search_query(&long);
        assert!(query.chars().count() <= MAX_QUERY_CHARS);
        assert!(query.ends_with("word"));
    }
}
