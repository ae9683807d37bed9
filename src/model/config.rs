use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

const ENV_CONFIG_PATH: &str = "VERDICT_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Hard ceiling on results requested from the search provider per call
pub const MAX_RESULTS_PER_QUERY: usize = 10;

/// Source filtering configuration applied to search results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceFilterConfig {
    /// Allowed domains (whitelist). If empty, all domains are allowed.
    #[serde(default)]
    pub allow: Vec<String>,
    /// Denied domains (blacklist). Applied after allow list.
    #[serde(default)]
    pub deny: Vec<String>,
}

impl SourceFilterConfig {
    /// Check if a URL is allowed based on the allow/deny lists
    pub fn is_url_allowed(&self, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(h) => h.to_lowercase(),
            None => return false,
        };

        if self.deny.iter().any(|d| host.contains(&d.to_lowercase())) {
            return false;
        }

        if self.allow.is_empty() {
            return true;
        }

        self.allow.iter().any(|a| host.contains(&a.to_lowercase()))
    }
}

/// Timing and sizing knobs for a pipeline run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// End-to-end deadline for one verification
    pub deadline_secs: u64,
    /// Time that must remain before escalation or extended searches are attempted
    pub escalation_reserve_secs: u64,
    pub oracle_timeout_secs: u64,
    pub provider_timeout_secs: u64,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_claims: usize,
    pub results_per_query: usize,
    /// Also query academic and government search variants
    pub extended_search: bool,
    pub max_autonomous_searches: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            deadline_secs: 45,
            escalation_reserve_secs: 10,
            oracle_timeout_secs: 20,
            provider_timeout_secs: 10,
            max_attempts: 3,
            initial_backoff_ms: 500,
            max_claims: 5,
            results_per_query: 5,
            extended_search: false,
            max_autonomous_searches: 3,
        }
    }
}

impl PipelineConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    pub fn escalation_reserve(&self) -> Duration {
        Duration::from_secs(self.escalation_reserve_secs)
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn results_per_query(&self) -> usize {
        self.results_per_query.clamp(1, MAX_RESULTS_PER_QUERY)
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub sources: SourceFilterConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub sources: SourceFilterConfig,
    pub pipeline: PipelineConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: SourceFilterConfig::default(),
            pipeline: PipelineConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        Self {
            sources: file.sources,
            pipeline: file.pipeline,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents).or_else(|| {
                tracing::warn!(path = %path.display(), "Failed to parse config file, using defaults");
                None
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    fn parse_config(contents: &str) -> Option<ConfigFile> {
        let contents = contents.trim();
        if contents.is_empty() {
            return Some(ConfigFile::default());
        }

        match serde_yaml::from_str(contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::debug!(error = %e, "Config YAML rejected");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deny_wins_over_allow() {
        let config = SourceFilterConfig {
            allow: vec!["example.com".to_string()],
            deny: vec!["bad.example.com".to_string()],
        };
        assert!(config.is_url_allowed(&Url::parse("https://www.example.com/a").unwrap()));
        assert!(!config.is_url_allowed(&Url::parse("https://bad.example.com/a").unwrap()));
        assert!(!config.is_url_allowed(&Url::parse("https://other.org/a").unwrap()));
    }

    #[test]
    fn test_empty_allow_admits_everything_not_denied() {
        let config = SourceFilterConfig {
            allow: vec![],
            deny: vec!["infowars".to_string()],
        };
        assert!(config.is_url_allowed(&Url::parse("https://reuters.com/x").unwrap()));
        assert!(!config.is_url_allowed(&Url::parse("https://www.infowars.com/x").unwrap()));
    }

    #[test]
    fn test_partial_pipeline_section_keeps_defaults() {
        let file = Config::parse_config(
            "pipeline:\n  deadline_secs: 30\n  extended_search: true\nsources:\n  deny: [example.net]\n",
        )
        .unwrap();
        assert_eq!(file.pipeline.deadline_secs, 30);
        assert!(file.pipeline.extended_search);
        assert_eq!(file.pipeline.max_attempts, 3);
        assert_eq!(file.sources.deny, vec!["example.net".to_string()]);
    }

    #[test]
    fn test_empty_and_invalid_config() {
        assert!(Config::parse_config("   ").is_some());
        assert!(Config::parse_config("pipeline: [not, a, map]").is_none());
    }

    #[test]
    fn test_results_per_query_is_capped() {
        let pipeline = PipelineConfig {
            results_per_query: 50,
            ..PipelineConfig::default()
        };
        assert_eq!(pipeline.results_per_query(), MAX_RESULTS_PER_QUERY);
    }
}
