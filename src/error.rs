//! Error types for the tavily-tools application.

use tavily_report::{LedgerError, SearchError};

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Logging could not be initialized.
    #[error("logging error: {0}")]
    Logging(String),

    /// Search provider failure.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// History export failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_errors_pass_through_unchanged() {
        let err: AppError = SearchError::Auth("invalid API key".into()).into();
        assert_eq!(err.to_string(), "authentication failed: invalid API key");
    }

    #[test]
    fn config_error_display() {
        let err = AppError::Config("TAVILY_API_KEY is not set".into());
        assert_eq!(err.to_string(), "config error: TAVILY_API_KEY is not set");
    }
}
