//! Web search tool handed to the oracle in autonomous-search mode

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Deserialize;

use crate::model::SearchHit;
use crate::service::search::SearchProvider;

const RESULTS_PER_SEARCH: usize = 5;

#[derive(Debug, Deserialize)]
pub struct WebSearchArgs {
    pub query: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WebSearchToolError {
    #[error("search budget of {0} exhausted")]
    BudgetExhausted(usize),

    #[error("search failed: {0}")]
    Search(String),
}

/// Search tool with a hard cap on invocations
pub struct WebSearchTool {
    provider: Arc<dyn SearchProvider>,
    budget: usize,
    used: AtomicUsize,
}

impl WebSearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>, budget: usize) -> Self {
        Self {
            provider,
            budget,
            used: AtomicUsize::new(0),
        }
    }

    /// Reserve one search from the budget
    fn take_search(&self) -> bool {
        self.used
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.budget).then_some(n + 1)
            })
            .is_ok()
    }
}

impl Tool for WebSearchTool {
    const NAME: &'static str = "web_search";

    type Error = WebSearchToolError;
    type Args = WebSearchArgs;
    type Output = Vec<SearchHit>;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: format!(
                "Search the web for evidence about the claim. Returns titles, URLs and snippets. \
                 At most {} searches are available.",
                self.budget
            ),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        if !self.take_search() {
            tracing::debug!(query = %args.query, "Autonomous search budget exhausted");
            return Err(WebSearchToolError::BudgetExhausted(self.budget));
        }

        tracing::debug!(query = %args.query, "Oracle-initiated web search");

        self.provider
            .search(&args.query, RESULTS_PER_SEARCH)
            .await
            .map_err(|e| WebSearchToolError::Search(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::StubSearch;

    #[tokio::test]
    async fn test_budget_is_enforced() {
        let search = Arc::new(StubSearch::with_hits(vec![SearchHit {
            title: "t".to_string(),
            url: "https://a.org".to_string(),
            snippet: "s".to_string(),
        }]));
        let tool = WebSearchTool::new(search.clone(), 2);

        for _ in 0..2 {
            let hits = tool
                .call(WebSearchArgs {
                    query: "q".to_string(),
                })
                .await
                .unwrap();
            assert_eq!(hits.len(), 1);
        }

        let third = tool
            .call(WebSearchArgs {
                query: "q".to_string(),
            })
            .await;
        assert!(matches!(third, Err(WebSearchToolError::BudgetExhausted(2))));
        assert_eq!(search.call_count(), 2);
    }
}
