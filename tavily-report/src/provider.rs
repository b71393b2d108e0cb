//! The search provider seam.
//!
//! The pipeline never talks to the network itself; it asks a
//! [`SearchProvider`] for a raw JSON response and treats any error as
//! non-normalizable. [`TavilyClient`](crate::tavily::TavilyClient) is the
//! production implementation; tests supply their own.

use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest `max_results` the Tavily API accepts.
pub const MAX_RESULTS_LIMIT: usize = 20;

/// How thoroughly the provider searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

impl fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        })
    }
}

/// Search category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchTopic {
    #[default]
    General,
    News,
}

/// Options forwarded to the provider with each query.
///
/// Serializes to the request body fields of the Tavily search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOptions {
    pub max_results: usize,
    pub search_depth: SearchDepth,
    pub topic: SearchTopic,
    /// Ask the provider for a generated answer.
    pub include_answer: bool,
    pub include_raw_content: bool,
    pub include_images: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_domains: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_domains: Vec<String>,
    /// Per-request timeout; not part of the request body.
    #[serde(skip)]
    pub timeout_seconds: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 10,
            search_depth: SearchDepth::Basic,
            topic: SearchTopic::General,
            include_answer: true,
            include_raw_content: false,
            include_images: false,
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
            timeout_seconds: 30,
        }
    }
}

impl SearchOptions {
    /// Validates these options.
    ///
    /// Checks:
    /// - `max_results` must be between 1 and [`MAX_RESULTS_LIMIT`]
    /// - `timeout_seconds` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 || self.max_results > MAX_RESULTS_LIMIT {
            return Err(SearchError::Config(format!(
                "max_results must be between 1 and {MAX_RESULTS_LIMIT}"
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// A web search backend returning raw, untrusted JSON responses.
///
/// Implementations must be `Send + Sync`. A returned `Ok` value may have any
/// shape; normalization absorbs malformed data.
pub trait SearchProvider: Send + Sync {
    /// Run one search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on network, authentication or provider failure.
    fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, SearchError>> + Send;

    /// Human-readable provider name for logs.
    fn name(&self) -> &str;
}
