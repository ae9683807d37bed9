//! Result cache for verification runs
//!
//! `CacheStore` is the storage seam: Redis in production, an in-memory map in
//! tests and when Redis is unavailable. `VerificationCache` layers typed,
//! best-effort access on top; its failures are logged, never propagated.

use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use tokio::time::Instant;

use crate::model::VerificationResult;
use crate::service::cache_keys::verification_cache_key;

// Environment variable names
const ENV_REDIS_HOST: &str = "VERDICT_REDIS_HOST";
const ENV_REDIS_PORT: &str = "VERDICT_REDIS_PORT";
const ENV_REDIS_PASSWORD: &str = "VERDICT_REDIS_PASSWORD";
const ENV_REDIS_DB: &str = "VERDICT_REDIS_DB";
const ENV_CACHE_TTL: &str = "VERDICT_CACHE_TTL";

// Default values
const DEFAULT_REDIS_HOST: &str = "127.0.0.1";
const DEFAULT_REDIS_PORT: &str = "6379";
const DEFAULT_REDIS_DB: &str = "0";
const DEFAULT_TTL_SECONDS: u64 = 24 * 60 * 60; // 24 hours

const PREFIX_VERIFICATION: &str = "verification:";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Key/value storage with per-entry expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// All live keys starting with `prefix`
    async fn scan(&self, prefix: &str) -> Result<Vec<String>, CacheError>;

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Redis-backed store
#[derive(Clone)]
pub struct RedisCacheStore {
    client: Client,
}

impl RedisCacheStore {
    /// Connect and verify the connection
    ///
    /// Configuration via environment variables:
    /// - `VERDICT_REDIS_HOST` - Redis host (default: 127.0.0.1)
    /// - `VERDICT_REDIS_PORT` - Redis port (default: 6379)
    /// - `VERDICT_REDIS_PASSWORD` - Redis password (default: none)
    /// - `VERDICT_REDIS_DB` - Redis database number (default: 0)
    pub async fn connect() -> Result<Self, CacheError> {
        let host = env::var(ENV_REDIS_HOST).unwrap_or_else(|_| DEFAULT_REDIS_HOST.to_string());
        let port = env::var(ENV_REDIS_PORT).unwrap_or_else(|_| DEFAULT_REDIS_PORT.to_string());
        let password = env::var(ENV_REDIS_PASSWORD).ok();
        let db = env::var(ENV_REDIS_DB).unwrap_or_else(|_| DEFAULT_REDIS_DB.to_string());

        // Build Redis URL: redis://[password@]host:port/db
        let redis_url = match password {
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        tracing::debug!(host = %host, port = %port, db = %db, "Connecting to Redis");

        let store = Self {
            client: Client::open(redis_url)?,
        };
        store.ping().await?;

        tracing::info!(host = %host, port = %port, "Redis connection established");
        Ok(store)
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn.get(key).await?)
    }

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key, value, ttl.as_secs().max(1)).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn scan(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let pattern = format!("{}*", prefix);

        let mut found = Vec::new();
        let mut cursor = 0u64;
        loop {
            let (new_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await?;
            found.extend(keys);

            if new_cursor == 0 {
                break;
            }
            cursor = new_cursor;
        }
        Ok(found)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

/// Process-local store; expired entries are dropped on read
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let expired = match entries.get(key) {
            Some((_, expires_at)) => *expires_at <= Instant::now(),
            None => return Ok(None),
        };
        if expired {
            entries.remove(key);
            return Ok(None);
        }
        Ok(entries.get(key).map(|(value, _)| value.clone()))
    }

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), (value, Instant::now() + ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }

    async fn scan(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        let now = Instant::now();
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries
            .iter()
            .filter(|(key, (_, expires_at))| key.starts_with(prefix) && *expires_at > now)
            .map(|(key, _)| key.clone())
            .collect())
    }
}

/// Typed cache of verification results keyed by normalized claim text
#[derive(Clone)]
pub struct VerificationCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl VerificationCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// TTL from `VERDICT_CACHE_TTL` (seconds), default 24 hours
    pub fn ttl_from_env() -> Duration {
        let seconds = env::var(ENV_CACHE_TTL)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TTL_SECONDS);
        Duration::from_secs(seconds)
    }

    fn key(text: &str) -> String {
        format!("{}{}", PREFIX_VERIFICATION, verification_cache_key(text))
    }

    pub async fn get(&self, text: &str) -> Option<VerificationResult> {
        let key = Self::key(text);
        let json = match self.store.get(&key).await {
            Ok(Some(json)) => json,
            Ok(None) => {
                tracing::debug!(key = %key, "Cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(result) => {
                tracing::debug!(key = %key, "Cache hit");
                Some(result)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    pub async fn set(&self, text: &str, result: &VerificationResult) {
        let key = Self::key(text);
        let json = match serde_json::to_string(result) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to serialize result for cache");
                return;
            }
        };

        match self.store.set_ex(&key, json, self.ttl).await {
            Ok(()) => tracing::debug!(key = %key, ttl_secs = self.ttl.as_secs(), "Cached data"),
            Err(e) => tracing::warn!(key = %key, error = %e, "Cache write failed"),
        }
    }

    /// Remove every cached verification, returning how many were removed
    pub async fn clear(&self) -> Result<usize, CacheError> {
        let keys = self.store.scan(PREFIX_VERIFICATION).await?;
        for key in &keys {
            self.store.delete(key).await?;
        }
        tracing::info!(removed = keys.len(), "Invalidated verification cache entries");
        Ok(keys.len())
    }

    pub async fn is_healthy(&self) -> bool {
        self.store.ping().await.is_ok()
    }
}
