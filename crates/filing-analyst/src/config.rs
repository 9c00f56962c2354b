//! Configuration for filing analysis operations

use crate::cache::CachePolicy;
use crate::error::{FilingError, Result};
use filing_utils::{env_parse, env_var};
use std::time::Duration;

pub const DEFAULT_SEC_API_BASE: &str = "https://api.sec-api.io";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o";

/// Configuration for filing analysis operations
#[derive(Debug, Clone)]
pub struct AnalystConfig {
    /// sec-api.io key; checked when a filing is fetched
    pub sec_api_key: Option<String>,

    /// Base URL of the filing provider
    pub sec_api_base: String,

    /// Filing provider requests per second
    pub sec_rate_limit: u32,

    /// Request timeout for the filing provider
    pub request_timeout: Duration,

    /// Chat model used by every analyst
    pub model: String,

    /// Sampling temperature for analyst calls
    pub temperature: f32,

    /// Maximum tokens per analyst response
    pub max_tokens: usize,

    /// Characters of filing text sent to the summary analyst
    pub summary_char_limit: usize,

    /// Retrieval chunk size in characters
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,

    /// Chunks retrieved per question
    pub retrieval_top_k: usize,

    /// Report cache policy
    pub report_cache: CachePolicy,

    /// Retrieval index cache policy
    pub index_cache: CachePolicy,

    /// Extra origin allowed by CORS besides the local frontend
    pub frontend_url: Option<String>,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            sec_api_key: None,
            sec_api_base: DEFAULT_SEC_API_BASE.to_string(),
            sec_rate_limit: 10,
            request_timeout: Duration::from_secs(60),
            model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: 0.0,
            max_tokens: 4096,
            summary_char_limit: 80_000,
            chunk_size: 1000,
            chunk_overlap: 200,
            retrieval_top_k: 4,
            report_cache: CachePolicy::unbounded()
                .with_capacity(512)
                .with_ttl(Duration::from_secs(24 * 60 * 60)),
            index_cache: CachePolicy::unbounded().with_capacity(64),
            frontend_url: None,
        }
    }
}

impl AnalystConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalystConfigBuilder {
        AnalystConfigBuilder::default()
    }

    /// Load configuration from environment variables over the defaults
    ///
    /// Reads `SEC_API_KEY`, `SEC_API_BASE`, `OPENAI_MODEL`, `FRONTEND_URL`,
    /// `REPORT_CACHE_CAPACITY`, `REPORT_CACHE_TTL_SECS`,
    /// `INDEX_CACHE_CAPACITY` and `INDEX_CACHE_TTL_SECS`. A TTL of zero
    /// disables expiry.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            sec_api_key: env_var("SEC_API_KEY"),
            sec_api_base: env_var("SEC_API_BASE").unwrap_or(defaults.sec_api_base),
            model: env_var("OPENAI_MODEL").unwrap_or(defaults.model),
            report_cache: policy_from_env(
                "REPORT_CACHE_CAPACITY",
                "REPORT_CACHE_TTL_SECS",
                defaults.report_cache,
            )?,
            index_cache: policy_from_env(
                "INDEX_CACHE_CAPACITY",
                "INDEX_CACHE_TTL_SECS",
                defaults.index_cache,
            )?,
            frontend_url: env_var("FRONTEND_URL"),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(FilingError::ConfigError(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(FilingError::ConfigError(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.retrieval_top_k == 0 {
            return Err(FilingError::ConfigError(
                "retrieval_top_k must be greater than 0".to_string(),
            ));
        }

        if self.sec_rate_limit == 0 {
            return Err(FilingError::ConfigError(
                "sec_rate_limit must be greater than 0".to_string(),
            ));
        }

        for (name, policy) in [("report", self.report_cache), ("index", self.index_cache)] {
            if policy.capacity == Some(0) {
                return Err(FilingError::ConfigError(format!(
                    "{name} cache capacity must be greater than 0"
                )));
            }
        }

        Ok(())
    }

    /// Origins allowed to call the HTTP API
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec!["http://localhost:3000".to_string()];
        if let Some(url) = &self.frontend_url {
            origins.push(url.trim_end_matches('/').to_string());
        }
        origins
    }
}

fn policy_from_env(capacity_var: &str, ttl_var: &str, fallback: CachePolicy) -> Result<CachePolicy> {
    let capacity = env_parse::<usize>(capacity_var)?.or(fallback.capacity);
    let ttl = match env_parse::<u64>(ttl_var)? {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => fallback.ttl,
    };
    Ok(CachePolicy { capacity, ttl })
}

/// Builder for AnalystConfig
#[derive(Debug, Default)]
pub struct AnalystConfigBuilder {
    sec_api_key: Option<String>,
    sec_api_base: Option<String>,
    sec_rate_limit: Option<u32>,
    request_timeout: Option<Duration>,
    model: Option<String>,
    max_tokens: Option<usize>,
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
    retrieval_top_k: Option<usize>,
    report_cache: Option<CachePolicy>,
    index_cache: Option<CachePolicy>,
    frontend_url: Option<String>,
}

impl AnalystConfigBuilder {
    /// Set the sec-api.io key
    pub fn sec_api_key(mut self, key: impl Into<String>) -> Self {
        self.sec_api_key = Some(key.into());
        self
    }

    /// Set the filing provider base URL
    pub fn sec_api_base(mut self, base: impl Into<String>) -> Self {
        self.sec_api_base = Some(base.into());
        self
    }

    /// Set the filing provider rate limit (requests per second)
    pub fn sec_rate_limit(mut self, per_second: u32) -> Self {
        self.sec_rate_limit = Some(per_second);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the chat model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set maximum tokens per analyst response
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set chunk size and overlap for retrieval indexes
    pub fn chunking(mut self, size: usize, overlap: usize) -> Self {
        self.chunk_size = Some(size);
        self.chunk_overlap = Some(overlap);
        self
    }

    /// Set the number of chunks retrieved per question
    pub fn retrieval_top_k(mut self, k: usize) -> Self {
        self.retrieval_top_k = Some(k);
        self
    }

    /// Set the report cache policy
    pub fn report_cache(mut self, policy: CachePolicy) -> Self {
        self.report_cache = Some(policy);
        self
    }

    /// Set the index cache policy
    pub fn index_cache(mut self, policy: CachePolicy) -> Self {
        self.index_cache = Some(policy);
        self
    }

    /// Set the deployed frontend origin
    pub fn frontend_url(mut self, url: impl Into<String>) -> Self {
        self.frontend_url = Some(url.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalystConfig> {
        let defaults = AnalystConfig::default();

        let config = AnalystConfig {
            sec_api_key: self.sec_api_key,
            sec_api_base: self.sec_api_base.unwrap_or(defaults.sec_api_base),
            sec_rate_limit: self.sec_rate_limit.unwrap_or(defaults.sec_rate_limit),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            model: self.model.unwrap_or(defaults.model),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            chunk_size: self.chunk_size.unwrap_or(defaults.chunk_size),
            chunk_overlap: self.chunk_overlap.unwrap_or(defaults.chunk_overlap),
            retrieval_top_k: self.retrieval_top_k.unwrap_or(defaults.retrieval_top_k),
            report_cache: self.report_cache.unwrap_or(defaults.report_cache),
            index_cache: self.index_cache.unwrap_or(defaults.index_cache),
            frontend_url: self.frontend_url,
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }
}
