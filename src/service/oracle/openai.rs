//! OpenAI-backed oracle built on rig

use std::sync::Arc;

use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::search_tool::WebSearchTool;
use super::{ClassificationOracle, OracleError, OracleRequest, parse_classification_text};
use crate::model::extraction::{RawClaims, RawClassification, RawDecomposition};
use crate::service::search::SearchProvider;

/// Environment variable for the classifier model (defaults to gpt-4o if not set)
const ENV_CLASSIFIER_MODEL: &str = "CLASSIFIER_MODEL";

const DEFAULT_MODEL: &str = openai::GPT_4O;

const SEARCH_MODE_INSTRUCTIONS: &str = r#"## Evidence Retrieval

You have a `web_search` tool. No evidence was supplied with this claim, so search
for it yourself before answering. Use focused queries. When you are done, answer
with ONLY a JSON object of the form:
{"category": "<category>", "confidence": <0..1>, "reasoning": "<2-4 sentences>"}"#;

/// Oracle implementation on the OpenAI API
pub struct OpenAiOracle {
    client: openai::Client,
    model: String,
    search: Arc<dyn SearchProvider>,
}

impl OpenAiOracle {
    /// Create an oracle with the provided API key
    ///
    /// Optionally uses the CLASSIFIER_MODEL env var (defaults to gpt-4o).
    pub fn new(api_key: &str, search: Arc<dyn SearchProvider>) -> Result<Self, String> {
        let client = openai::Client::new(api_key)
            .map_err(|e| format!("Failed to create OpenAI client: {}", e))?;

        let model =
            std::env::var(ENV_CLASSIFIER_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        tracing::info!(model = %model, "Classification oracle initialized");

        Ok(Self {
            client,
            model,
            search,
        })
    }

    async fn extract<T>(&self, request: &OracleRequest, operation: &str) -> Result<T, OracleError>
    where
        T: JsonSchema + DeserializeOwned + Serialize + Send + Sync + 'static,
    {
        let start_time = std::time::Instant::now();
        let prompt_length = request.user_prompt.len();

        tracing::debug!(
            operation = operation,
            model = %self.model,
            prompt_length = prompt_length,
            temperature = request.temperature,
            "Initiating OpenAI API call"
        );

        let extractor = self
            .client
            .extractor::<T>(&self.model)
            .preamble(&request.system_prompt)
            .additional_params(serde_json::json!({
                "temperature": request.temperature
            }))
            .build();

        match extractor.extract(&request.user_prompt).await {
            Ok(result) => {
                tracing::info!(
                    operation = operation,
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt_length,
                    "OpenAI API call completed successfully"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!(
                    operation = operation,
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt_length,
                    error = %e,
                    "OpenAI API call failed"
                );
                Err(OracleError::from_provider_message(e.to_string()))
            }
        }
    }
}

#[async_trait::async_trait]
impl ClassificationOracle for OpenAiOracle {
    async fn classify(&self, request: &OracleRequest) -> Result<RawClassification, OracleError> {
        self.extract(request, "classify").await
    }

    async fn classify_with_search(
        &self,
        request: &OracleRequest,
        max_searches: usize,
    ) -> Result<RawClassification, OracleError> {
        let start_time = std::time::Instant::now();

        let agent = self
            .client
            .agent(&self.model)
            .preamble(&format!(
                "{}\n\n{}",
                request.system_prompt, SEARCH_MODE_INSTRUCTIONS
            ))
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .tool(WebSearchTool::new(Arc::clone(&self.search), max_searches))
            .build();

        // one turn per permitted search plus the final answer
        let response = agent
            .prompt(request.user_prompt.as_str())
            .multi_turn(max_searches + 1)
            .await
            .map_err(|e| {
                tracing::error!(
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    error = %e,
                    "OpenAI search-mode classification failed"
                );
                OracleError::from_provider_message(e.to_string())
            })?;

        tracing::info!(
            model = %self.model,
            elapsed_ms = start_time.elapsed().as_millis(),
            max_searches = max_searches,
            "OpenAI search-mode classification completed"
        );

        parse_classification_text(&response)
    }

    async fn decompose(&self, request: &OracleRequest) -> Result<RawDecomposition, OracleError> {
        self.extract(request, "decompose").await
    }

    async fn extract_claims(&self, request: &OracleRequest) -> Result<RawClaims, OracleError> {
        self.extract(request, "extract_claims").await
    }
}
