//! Tavily search API client.
//!
//! Posts JSON to `{base_url}/search` with a bearer API key and returns the
//! raw response body. The body is not interpreted here; normalization is
//! the pipeline's job.

use crate::error::SearchError;
use crate::provider::{SearchOptions, SearchProvider};
use reqwest::StatusCode;
use std::time::Duration;

/// Public Tavily API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Longest provider error body kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Connection settings for [`TavilyClient`].
#[derive(Clone)]
pub struct TavilyConfig {
    pub api_key: String,
    pub base_url: String,
}

impl TavilyConfig {
    /// Create a config for the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl std::fmt::Debug for TavilyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// HTTP client for the Tavily search endpoint.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    config: TavilyConfig,
    endpoint: url::Url,
    client: reqwest::Client,
}

impl TavilyClient {
    /// Build a client.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the API key is empty or the base
    /// URL is invalid, and [`SearchError::Http`] if the HTTP client cannot
    /// be constructed.
    pub fn new(config: TavilyConfig) -> Result<Self, SearchError> {
        if config.api_key.trim().is_empty() {
            return Err(SearchError::Config("Tavily API key is not set".into()));
        }
        let endpoint = search_endpoint(&config.base_url)?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("tavily-report/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            endpoint,
            client,
        })
    }

    /// The resolved search endpoint.
    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    fn request_body(
        query: &str,
        options: &SearchOptions,
    ) -> Result<serde_json::Value, SearchError> {
        let mut body = serde_json::to_value(options)
            .map_err(|e| SearchError::Config(format!("failed to encode options: {e}")))?;
        if let Some(obj) = body.as_object_mut() {
            obj.insert("query".into(), serde_json::Value::String(query.to_owned()));
        }
        Ok(body)
    }

    fn map_status(status: StatusCode, body: &str) -> SearchError {
        let message = truncate_body(body, status);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SearchError::Auth(message),
            StatusCode::TOO_MANY_REQUESTS => SearchError::RateLimited(message),
            _ => SearchError::Provider {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl SearchProvider for TavilyClient {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<serde_json::Value, SearchError> {
        options.validate()?;
        let body = Self::request_body(query, options)?;
        tracing::debug!(%query, depth = %options.search_depth, "sending Tavily search");

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.config.api_key)
            .timeout(Duration::from_secs(options.timeout_seconds))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout(format!(
                        "no response within {}s",
                        options.timeout_seconds
                    ))
                } else {
                    SearchError::Http(format!("Tavily request failed: {e}"))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            let err = Self::map_status(status, &text);
            tracing::warn!(status = status.as_u16(), error = %err, "Tavily search failed");
            return Err(err);
        }

        serde_json::from_str(&text)
            .map_err(|e| SearchError::InvalidResponse(format!("body is not JSON: {e}")))
    }

    fn name(&self) -> &str {
        "tavily"
    }
}

/// `{base_url}/search`, tolerating a base URL with or without trailing slash.
fn search_endpoint(base_url: &str) -> Result<url::Url, SearchError> {
    let mut base = url::Url::parse(base_url)
        .map_err(|e| SearchError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("search")
        .map_err(|e| SearchError::Config(format!("invalid base URL {base_url:?}: {e}")))
}

fn truncate_body(body: &str, status: StatusCode) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_owned();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
