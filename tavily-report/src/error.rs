//! Error types for the tavily-report crate.
//!
//! Malformed search data is never an error: the sanitizer absorbs it by
//! defaulting and clamping. The types here cover operational failures only
//! (network, disk, configuration) plus the "nothing to do" signal of an
//! empty ledger. Messages are stable and never contain API keys.

use std::path::PathBuf;

/// Errors raised by the external search provider.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Transport-level HTTP failure (DNS, connection refused, TLS).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request did not complete within the configured timeout.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// The provider rejected the API key.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The provider is throttling requests.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The provider answered with a non-success status.
    #[error("provider error (status {status}): {message}")]
    Provider {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The response body was not JSON.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid search configuration or options.
    #[error("config error: {0}")]
    Config(String),
}

/// Errors raised while persisting a rendered artifact.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// Neither the configured directory nor the fallback could be created.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing, syncing or renaming the artifact failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested filename has no usable final path segment.
    #[error("invalid artifact filename: {0:?}")]
    InvalidFileName(String),

    /// The artifact could not be serialized.
    #[error("failed to serialize artifact: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised by session ledger operations that do not involve a search.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// There is no history to export.
    #[error("no search history to export")]
    EmptyHistory,

    /// The export could not be written.
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Invalid [`ReportConfig`](crate::ReportConfig) values.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(pub String);

/// Convenience type alias for search results.
pub type Result<T> = std::result::Result<T, SearchError>;
