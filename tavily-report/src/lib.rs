//! # tavily-report
//!
//! Turns raw Tavily web search responses into clean records, quality
//! statistics and persisted JSON/HTML reports.
//!
//! ## Design
//!
//! - Sanitizes untrusted responses into a [`NormalizedRecord`]; malformed
//!   fields are defaulted or clamped, never rejected
//! - Buckets result scores into high / medium / low quality
//! - Renders a structured JSON document, a self-contained HTML report and
//!   console text
//! - Writes artifacts atomically with filesystem-safe names
//! - Keeps a per-session history of executed queries with batch and export
//!
//! ## Security
//!
//! - Every string interpolated into HTML is escaped; only `http(s)` URLs
//!   become links
//! - Caller-supplied filenames are reduced to their final path segment
//! - Search queries are logged only at debug level; API keys never are

pub mod config;
pub mod error;
pub mod ledger;
pub mod normalize;
pub mod provider;
pub mod quality;
pub mod render;
pub mod tavily;
pub mod types;
pub mod writer;

pub use config::ReportConfig;
pub use error::{ConfigError, LedgerError, Result, SearchError, WriteError};
pub use ledger::{
    ArtifactFailure, ArtifactPaths, BatchFailure, BatchReport, FormatOptions, SearchOutcome,
    SessionLedger,
};
pub use normalize::normalize;
pub use provider::{SearchDepth, SearchOptions, SearchProvider, SearchTopic};
pub use quality::analyze;
pub use render::{ReportRenderer, StructuredReport};
pub use tavily::{TavilyClient, TavilyConfig};
pub use types::{
    HistoryEntry, NormalizedRecord, NormalizedResult, QualityReport, ResponseTime,
    ScoreDistribution,
};
pub use writer::{ArtifactKind, ArtifactWriter};

/// Normalize, analyze and render a raw response in one step.
///
/// Convenience for callers that already hold a response and only need the
/// structured document and its statistics.
///
/// # Examples
///
/// ```
/// let raw = serde_json::json!({
///     "query": "rust",
///     "results": [{"title": "Rust", "url": "https://www.rust-lang.org", "score": 0.9}]
/// });
/// let (report, quality) = tavily_report::process(&raw);
/// assert_eq!(report.results.len(), 1);
/// assert_eq!(quality.distribution.high, 1);
/// ```
pub fn process(raw: &serde_json::Value) -> (StructuredReport, QualityReport) {
    let record = normalize(raw);
    let quality = analyze(&record);
    (render::structured::to_structured(&record), quality)
}
