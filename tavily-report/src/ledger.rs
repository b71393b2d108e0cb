//! Session ledger: the search → normalize → analyze → persist pipeline.
//!
//! A [`SessionLedger`] owns its provider and an in-memory history of the
//! queries it ran. Searches are strictly sequential; batch items never
//! overlap and one failing query does not stop the rest.

use crate::config::ReportConfig;
use crate::error::{LedgerError, SearchError, WriteError};
use crate::normalize::normalize;
use crate::provider::{SearchOptions, SearchProvider};
use crate::quality::analyze;
use crate::render::ReportRenderer;
use crate::types::{HistoryEntry, NormalizedRecord, QualityReport};
use crate::writer::{history_file_name, resolve_file_name, ArtifactKind, ArtifactWriter};
use chrono::Local;
use serde_json::Value;
use std::path::PathBuf;

/// Which artifacts to produce for a search, and under which names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOptions {
    pub save_json: bool,
    /// Only honoured when HTML is enabled in [`ReportConfig`].
    pub save_html: bool,
    pub json_filename: Option<String>,
    pub html_filename: Option<String>,
    /// Overrides the default HTML report title.
    pub html_title: Option<String>,
    /// Also save the provider response exactly as received.
    pub save_raw: bool,
    pub raw_filename: Option<String>,
}

impl FormatOptions {
    /// Save both JSON and HTML with generated names. The raw response is
    /// not included.
    pub fn save_all() -> Self {
        Self {
            save_json: true,
            save_html: true,
            ..Default::default()
        }
    }
}

/// A write that failed while the search itself succeeded.
#[derive(Debug)]
pub struct ArtifactFailure {
    pub kind: ArtifactKind,
    pub error: WriteError,
}

/// Artifacts produced for one search.
#[derive(Debug, Default)]
pub struct ArtifactPaths {
    pub json: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub raw: Option<PathBuf>,
    pub failures: Vec<ArtifactFailure>,
}

/// Result of one successful search.
#[derive(Debug)]
pub struct SearchOutcome {
    pub record: NormalizedRecord,
    pub quality: QualityReport,
    pub artifacts: ArtifactPaths,
}

/// A batch query that failed at the provider.
#[derive(Debug)]
pub struct BatchFailure {
    /// Position in the input list, starting at 0.
    pub index: usize,
    pub query: String,
    pub error: SearchError,
}

/// Outcome of [`SessionLedger::batch`].
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successful outcomes in input order.
    pub successes: Vec<SearchOutcome>,
    /// Failed queries in input order.
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Mean of the per-query average scores of successful searches, or `0.0`.
    pub fn average_score(&self) -> f64 {
        if self.successes.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .successes
            .iter()
            .map(|o| o.quality.average_score)
            .sum();
        sum / self.successes.len() as f64
    }

    /// Sum of result counts over successful searches.
    pub fn total_results(&self) -> usize {
        self.successes.iter().map(|o| o.record.result_count()).sum()
    }
}

/// Runs searches through a provider and remembers what was run.
pub struct SessionLedger<P> {
    provider: P,
    config: ReportConfig,
    options: SearchOptions,
    renderer: ReportRenderer,
    writer: ArtifactWriter,
    history: Vec<HistoryEntry>,
}

impl<P: SearchProvider> SessionLedger<P> {
    /// Create a ledger with default search options.
    pub fn new(provider: P, config: ReportConfig) -> Self {
        Self {
            provider,
            renderer: ReportRenderer::new(&config),
            writer: ArtifactWriter::new(&config),
            config,
            options: SearchOptions::default(),
            history: Vec::new(),
        }
    }

    /// Set the options forwarded to the provider with every query.
    pub fn with_search_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn search_options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn renderer(&self) -> &ReportRenderer {
        &self.renderer
    }

    /// Search, normalize, analyze and optionally persist one query.
    ///
    /// A history entry is appended only when the provider call succeeds.
    /// Failed writes are logged and recorded in
    /// [`ArtifactPaths::failures`]; they do not fail the call.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`SearchError`] unchanged.
    pub async fn search_and_format(
        &mut self,
        query: &str,
        format: &FormatOptions,
    ) -> Result<SearchOutcome, SearchError> {
        tracing::debug!(provider = self.provider.name(), %query, "running search");
        let raw = self.provider.search(query, &self.options).await?;

        let record = normalize(&raw);
        let quality = analyze(&record);
        let artifacts = self.persist(&raw, &record, query, format);

        self.history.push(HistoryEntry {
            query: query.to_owned(),
            timestamp: Local::now(),
            result_count: record.result_count(),
            response_time: record.response_time,
        });

        Ok(SearchOutcome {
            record,
            quality,
            artifacts,
        })
    }

    /// Run `queries` one after another, isolating failures.
    pub async fn batch<S: AsRef<str>>(
        &mut self,
        queries: &[S],
        format: &FormatOptions,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for (index, query) in queries.iter().enumerate() {
            let query = query.as_ref();
            match self.search_and_format(query, format).await {
                Ok(outcome) => report.successes.push(outcome),
                Err(error) => {
                    tracing::warn!(index, %error, "batch query failed");
                    report.failures.push(BatchFailure {
                        index,
                        query: query.to_owned(),
                        error,
                    });
                }
            }
        }
        tracing::info!(
            succeeded = report.successes.len(),
            failed = report.failures.len(),
            "batch complete"
        );
        report
    }

    /// Write the history as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EmptyHistory`] when nothing has been searched
    /// yet, or [`LedgerError::Write`] if the file cannot be written.
    pub fn export_history(&self, filename: Option<&str>) -> Result<PathBuf, LedgerError> {
        if self.history.is_empty() {
            return Err(LedgerError::EmptyHistory);
        }
        let json = serde_json::to_string_pretty(&self.history).map_err(WriteError::from)?;
        let name = resolve_file_name(filename, || history_file_name(Local::now()));
        Ok(self.writer.write_named(&json, &name)?)
    }

    pub fn clear_history(&mut self) {
        tracing::debug!(entries = self.history.len(), "clearing history");
        self.history.clear();
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Sum of result counts across the history.
    pub fn total_results(&self) -> usize {
        self.history.iter().map(|e| e.result_count).sum()
    }

    fn persist(
        &self,
        raw: &Value,
        record: &NormalizedRecord,
        query: &str,
        format: &FormatOptions,
    ) -> ArtifactPaths {
        let mut artifacts = ArtifactPaths::default();

        if format.save_json {
            let written = self
                .renderer
                .to_json(record)
                .map_err(WriteError::from)
                .and_then(|json| {
                    self.writer.write(
                        &json,
                        format.json_filename.as_deref(),
                        Some(query),
                        ArtifactKind::Json,
                    )
                });
            match written {
                Ok(path) => artifacts.json = Some(path),
                Err(error) => record_failure(&mut artifacts, ArtifactKind::Json, error),
            }
        }

        if format.save_html {
            if self.config.enable_html {
                let html = self.renderer.to_html(record, format.html_title.as_deref());
                match self.writer.write(
                    &html,
                    format.html_filename.as_deref(),
                    Some(query),
                    ArtifactKind::Html,
                ) {
                    Ok(path) => artifacts.html = Some(path),
                    Err(error) => record_failure(&mut artifacts, ArtifactKind::Html, error),
                }
            } else {
                tracing::debug!("HTML reports disabled, skipping");
            }
        }

        if format.save_raw {
            let written = serde_json::to_string_pretty(raw)
                .map_err(WriteError::from)
                .and_then(|json| {
                    self.writer.write(
                        &json,
                        format.raw_filename.as_deref(),
                        Some(query),
                        ArtifactKind::RawJson,
                    )
                });
            match written {
                Ok(path) => artifacts.raw = Some(path),
                Err(error) => record_failure(&mut artifacts, ArtifactKind::RawJson, error),
            }
        }

        artifacts
    }
}

fn record_failure(artifacts: &mut ArtifactPaths, kind: ArtifactKind, error: WriteError) {
    tracing::warn!(kind = kind.label(), %error, "failed to save artifact");
    artifacts.failures.push(ArtifactFailure { kind, error });
}
