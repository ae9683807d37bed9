//! In-process stand-ins for the oracle and the evidence providers

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::model::extraction::{RawClaim, RawClaims, RawClassification, RawComponent, RawDecomposition};
use crate::model::{FactCheckRecord, SearchHit};
use crate::service::factcheck::{FactCheckError, FactCheckProvider};
use crate::service::oracle::{ClassificationOracle, OracleError, OracleRequest};
use crate::service::search::{SearchError, SearchProvider};

pub fn raw(category: &str, confidence: f64, reasoning: &str) -> RawClassification {
    RawClassification {
        category: category.to_string(),
        confidence,
        reasoning: reasoning.to_string(),
    }
}

pub fn hit(url: &str, title: &str, snippet: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        url: url.to_string(),
        snippet: snippet.to_string(),
    }
}

pub fn fact_check(org: &str, verdict: &str) -> FactCheckRecord {
    FactCheckRecord {
        org: org.to_string(),
        verdict: verdict.to_string(),
        date: "2024-03-01".to_string(),
        url: Some(format!(
            "https://{}.org/check/{}",
            org.to_lowercase().replace(' ', ""),
            verdict.to_lowercase().replace(' ', "-")
        )),
        claim_reviewed: None,
    }
}

type Queue = Mutex<VecDeque<Result<RawClassification, OracleError>>>;

/// Scripted oracle
///
/// Queued results are consumed first; afterwards the default classification is
/// returned. Decomposition and claim extraction answer with fixed results.
pub struct StubOracle {
    default: RawClassification,
    classify_queue: Queue,
    search_queue: Queue,
    decomposition: Result<RawDecomposition, OracleError>,
    claims: Result<RawClaims, OracleError>,
    delay: Option<Duration>,
    requests: Mutex<Vec<OracleRequest>>,
    classify_calls: AtomicUsize,
    search_calls: AtomicUsize,
    decompose_calls: AtomicUsize,
    extract_calls: AtomicUsize,
}

impl StubOracle {
    pub fn classifying(category: &str, confidence: f64) -> Self {
        Self {
            default: raw(category, confidence, "Stub reasoning."),
            classify_queue: Mutex::new(VecDeque::new()),
            search_queue: Mutex::new(VecDeque::new()),
            decomposition: Ok(RawDecomposition::default()),
            claims: Ok(RawClaims::default()),
            delay: None,
            requests: Mutex::new(Vec::new()),
            classify_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
            decompose_calls: AtomicUsize::new(0),
            extract_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_classifications(self, results: Vec<Result<RawClassification, OracleError>>) -> Self {
        *self.classify_queue.lock().unwrap() = results.into();
        self
    }

    pub fn with_search_classifications(
        self,
        results: Vec<Result<RawClassification, OracleError>>,
    ) -> Self {
        *self.search_queue.lock().unwrap() = results.into();
        self
    }

    /// Components as (text, type, verifiability)
    pub fn with_components(mut self, components: &[(&str, &str, f64)]) -> Self {
        self.decomposition = Ok(RawDecomposition {
            components: components
                .iter()
                .map(|(text, kind, score)| RawComponent {
                    id: None,
                    text: text.to_string(),
                    component_type: kind.to_string(),
                    verifiability_score: *score,
                    explanation: "Stub explanation.".to_string(),
                })
                .collect(),
        });
        self
    }

    /// Claims as (text, type, confidence)
    pub fn with_claims(mut self, claims: &[(&str, &str, f64)]) -> Self {
        self.claims = Ok(RawClaims {
            claims: claims
                .iter()
                .map(|(text, kind, confidence)| RawClaim {
                    text: text.to_string(),
                    claim_type: kind.to_string(),
                    confidence: *confidence,
                })
                .collect(),
        });
        self
    }

    pub fn failing_decomposition(mut self, error: OracleError) -> Self {
        self.decomposition = Err(error);
        self
    }

    pub fn failing_extraction(mut self, error: OracleError) -> Self {
        self.claims = Err(error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn decompose_calls(&self) -> usize {
        self.decompose_calls.load(Ordering::SeqCst)
    }

    pub fn extract_calls(&self) -> usize {
        self.extract_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<OracleRequest> {
        self.requests.lock().unwrap().clone()
    }

    async fn record(&self, request: &OracleRequest) {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn next(&self, queue: &Queue) -> Result<RawClassification, OracleError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.default.clone()))
    }
}

#[async_trait]
impl ClassificationOracle for StubOracle {
    async fn classify(&self, request: &OracleRequest) -> Result<RawClassification, OracleError> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        self.record(request).await;
        self.next(&self.classify_queue)
    }

    async fn classify_with_search(
        &self,
        request: &OracleRequest,
        _max_searches: usize,
    ) -> Result<RawClassification, OracleError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.record(request).await;
        self.next(&self.search_queue)
    }

    async fn decompose(&self, request: &OracleRequest) -> Result<RawDecomposition, OracleError> {
        self.decompose_calls.fetch_add(1, Ordering::SeqCst);
        self.record(request).await;
        self.decomposition.clone()
    }

    async fn extract_claims(&self, request: &OracleRequest) -> Result<RawClaims, OracleError> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        self.record(request).await;
        self.claims.clone()
    }
}

/// Search provider returning the same hits for every query
#[derive(Default)]
pub struct StubSearch {
    hits: Vec<SearchHit>,
    fail: bool,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl StubSearch {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(SearchError::Timeout);
        }
        Ok(self.hits.iter().take(count).cloned().collect())
    }
}

/// Fact-check registry returning fixed records
#[derive(Default)]
pub struct StubFactCheck {
    records: Vec<FactCheckRecord>,
    fail: bool,
    calls: AtomicUsize,
}

impl StubFactCheck {
    pub fn with_records(records: Vec<FactCheckRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FactCheckProvider for StubFactCheck {
    async fn search(&self, _claim_text: &str) -> Result<Vec<FactCheckRecord>, FactCheckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FactCheckError::Timeout);
        }
        Ok(self.records.clone())
    }
}
