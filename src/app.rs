//! Application state and service initialization
//!
//! This module centralizes all service initialization and dependency injection,
//! making it easier to manage the application lifecycle and test services.

use std::sync::Arc;

use crate::model::Config;
use crate::service::search::SearchProvider;
use crate::service::{
    BraveSearchClient, GoogleFactCheckClient, MemoryCacheStore, OpenAiOracle, RedisCacheStore,
    VerificationCache, VerificationService,
};

const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const ENV_BRAVE_SEARCH_API_KEY: &str = "BRAVE_SEARCH_API_KEY";
const ENV_FACT_CHECK_API_KEY: &str = "FACT_CHECK_API_KEY";
const ENV_CACHE_BACKEND: &str = "VERDICT_CACHE_BACKEND";

/// Application state containing all services and shared resources
pub struct AppState {
    /// Verification pipeline, shared by every handler
    pub verification_service: Arc<VerificationService>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Result cache initialization (optional)
    /// 2. Provider client initialization (requires the three API keys)
    /// 3. Service dependency graph construction
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let cache = Self::build_cache().await;

        let openai_key = required_env(ENV_OPENAI_API_KEY)?;
        let search_key = required_env(ENV_BRAVE_SEARCH_API_KEY)?;
        let fact_check_key = required_env(ENV_FACT_CHECK_API_KEY)?;

        let provider_timeout = config.pipeline.provider_timeout();

        let search: Arc<dyn SearchProvider> =
            Arc::new(BraveSearchClient::new(&search_key, provider_timeout));
        let fact_checks = Arc::new(GoogleFactCheckClient::new(&fact_check_key, provider_timeout));

        let oracle = OpenAiOracle::new(&openai_key, Arc::clone(&search)).map_err(|e| {
            tracing::error!(error = %e, "Failed to initialize classification oracle");
            AppError::InvalidConfig("Invalid OPENAI_API_KEY")
        })?;

        tracing::info!(
            deadline_secs = config.pipeline.deadline_secs,
            max_claims = config.pipeline.max_claims,
            extended_search = config.pipeline.extended_search,
            allow = config.sources.allow.len(),
            deny = config.sources.deny.len(),
            "Verification pipeline configured"
        );

        let verification_service = Arc::new(VerificationService::new(
            Arc::new(oracle),
            search,
            fact_checks,
            config.sources,
            config.pipeline,
            cache,
        ));

        Ok(Self {
            verification_service,
        })
    }

    /// Build the result cache selected by VERDICT_CACHE_BACKEND
    ///
    /// `redis` (default) falls back to no cache when Redis is unreachable;
    /// `memory` keeps results in-process; `none` disables caching.
    async fn build_cache() -> Option<VerificationCache> {
        let backend = std::env::var(ENV_CACHE_BACKEND).unwrap_or_else(|_| "redis".to_string());
        let ttl = VerificationCache::ttl_from_env();

        match backend.trim().to_lowercase().as_str() {
            "none" => {
                tracing::info!("Result cache disabled");
                None
            }
            "memory" => {
                tracing::info!(ttl_secs = ttl.as_secs(), "In-memory cache enabled");
                Some(VerificationCache::new(Arc::new(MemoryCacheStore::new()), ttl))
            }
            other => {
                if other != "redis" {
                    tracing::warn!(backend = other, "Unknown cache backend, using redis");
                }
                match RedisCacheStore::connect().await {
                    Ok(store) => {
                        tracing::info!(ttl_secs = ttl.as_secs(), "Redis cache enabled");
                        Some(VerificationCache::new(Arc::new(store), ttl))
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Redis cache unavailable, running without cache");
                        None
                    }
                }
            }
        }
    }
}

fn required_env(name: &'static str) -> Result<String, AppError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::MissingConfig(name)),
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
