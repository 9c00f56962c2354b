//! sec-api.io client for locating and rendering the latest filing of a form type
//!
//! Two endpoints are used:
//! - Query API (`POST {base}?token=KEY`): Lucene-style search over filing
//!   metadata, newest first
//! - Filing Reader (`GET {base}/filing-reader?token=KEY&url=...`): the
//!   filing document as HTML
//!
//! Requests share one rate limiter (10 per second by default).

use crate::config::AnalystConfig;
use crate::error::{FilingError, Result};
use crate::filing::FilingType;
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, info, instrument};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Source of raw filing documents
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilingProvider: Send + Sync {
    /// HTML of the most recent filing of `filing_type` for `ticker`
    async fn fetch_filing_html(&self, ticker: &str, filing_type: FilingType) -> Result<String>;
}

/// Filing metadata returned by the Query API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingMetadata {
    /// Ticker the filing is indexed under
    #[serde(default)]
    pub ticker: Option<String>,
    /// Form type ("10-K", ...)
    #[serde(default)]
    pub form_type: Option<String>,
    /// Filing timestamp (ISO 8601)
    #[serde(default)]
    pub filed_at: Option<String>,
    /// URL of the primary filing document
    #[serde(default)]
    pub link_to_filing_details: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    filings: Vec<FilingMetadata>,
}

/// sec-api.io client
pub struct SecApiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    rate_limiter: SharedRateLimiter,
}

impl SecApiClient {
    /// Create a client from analyst configuration
    pub fn from_config(config: &AnalystConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        let per_second = NonZeroU32::new(config.sec_rate_limit).ok_or_else(|| {
            FilingError::ConfigError("sec_rate_limit must be greater than 0".to_string())
        })?;
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

        Ok(Self {
            client,
            api_key: config.sec_api_key.clone(),
            base_url: config.sec_api_base.trim_end_matches('/').to_string(),
            rate_limiter,
        })
    }

    /// Create a client with default settings and the given key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(&AnalystConfig::builder().sec_api_key(api_key).build()?)
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                FilingError::ConfigError(
                    "SEC_API_KEY not found. Please set it in your .env file.".to_string(),
                )
            })
    }

    /// Find the most recent filing of a form type for a ticker
    #[instrument(skip(self))]
    pub async fn latest_filing(&self, ticker: &str, filing_type: FilingType) -> Result<FilingMetadata> {
        let api_key = self.api_key()?;
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .post(&self.base_url)
            .query(&[("token", api_key)])
            .json(&filing_query(ticker, filing_type))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FilingError::ApiError(format!(
                "sec-api.io query failed ({status}): {body}"
            )));
        }

        let parsed: QueryResponse = response.json().await.map_err(|e| {
            FilingError::ApiError(format!("Failed to parse sec-api.io response: {e}"))
        })?;

        parsed.filings.into_iter().next().ok_or_else(|| {
            FilingError::NotFound(format!(
                "No filings of type {filing_type} found for ticker {ticker}."
            ))
        })
    }

    /// Download a filing document as HTML
    #[instrument(skip(self))]
    pub async fn render_filing(&self, url: &str) -> Result<String> {
        let api_key = self.api_key()?;
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(format!("{}/filing-reader", self.base_url))
            .query(&[("token", api_key), ("url", url)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FilingError::ApiError(format!(
                "sec-api.io filing reader failed: {}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl FilingProvider for SecApiClient {
    async fn fetch_filing_html(&self, ticker: &str, filing_type: FilingType) -> Result<String> {
        let filing = self.latest_filing(ticker, filing_type).await?;
        let url = filing.link_to_filing_details.ok_or_else(|| {
            FilingError::ApiError("Filing found, but it's missing a URL to its details.".to_string())
        })?;
        info!(%ticker, %filing_type, filed_at = ?filing.filed_at, "Found filing URL: {}", url);

        let html = self.render_filing(&url).await?;
        debug!("Rendered filing: {} bytes", html.len());
        Ok(html)
    }
}

/// Query API body for the newest filing of a form type
fn filing_query(ticker: &str, filing_type: FilingType) -> serde_json::Value {
    json!({
        "query": {
            "query_string": {
                "query": format!("ticker:{ticker} AND formType:\"{filing_type}\"")
            }
        },
        "from": "0",
        "size": "1",
        "sort": [{ "filedAt": { "order": "desc" } }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SecApiClient::new("test-key").unwrap();
        assert_eq!(client.base_url, "https://api.sec-api.io");
        assert_eq!(client.api_key().unwrap(), "test-key");
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let client = SecApiClient::from_config(&AnalystConfig::default()).unwrap();
        let result = client.fetch_filing_html("AAPL", FilingType::Form10K).await;
        assert!(matches!(result, Err(FilingError::ConfigError(ref m)) if m.contains("SEC_API_KEY")));
    }

    #[test]
    fn test_filing_query() {
        let query = filing_query("AAPL", FilingType::Form10Q);
        assert_eq!(
            query["query"]["query_string"]["query"],
            r#"ticker:AAPL AND formType:"10-Q""#
        );
        assert_eq!(query["size"], "1");
        assert_eq!(query["sort"][0]["filedAt"]["order"], "desc");
    }

    #[test]
    fn test_query_response_parsing() {
        let body = r#"{"total":{"value":1},"filings":[{"ticker":"AAPL","formType":"10-K",
            "filedAt":"2024-11-01T06:01:36-04:00",
            "linkToFilingDetails":"https://www.sec.gov/Archives/edgar/data/320193/aapl-20240928.htm"}]}"#;
        let parsed: QueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.filings.len(), 1);
        assert!(
            parsed.filings[0]
                .link_to_filing_details
                .as_deref()
                .unwrap()
                .ends_with("aapl-20240928.htm")
        );

        let empty: QueryResponse = serde_json::from_str(r#"{"total":{"value":0}}"#).unwrap();
        assert!(empty.filings.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network access and SEC_API_KEY
    async fn test_fetch_latest_10k() {
        let config = AnalystConfig::from_env().unwrap();
        let client = SecApiClient::from_config(&config).unwrap();
        let html = client.fetch_filing_html("AAPL", FilingType::Form10K).await.unwrap();
        assert!(html.len() > 10_000);
    }
}
