//! Report rendering: structured JSON document, HTML report and console text.
//!
//! All renderers are pure functions of a [`NormalizedRecord`]. Display
//! truncation of result content happens here and never mutates the record.

pub mod console;
pub mod html;
pub mod structured;

use crate::config::ReportConfig;
use crate::types::{NormalizedRecord, QualityReport};
use chrono::{DateTime, Local};

pub use structured::{SearchInfo, StructuredReport, StructuredResult};

/// Suffix appended to truncated content.
pub const ELLIPSIS: &str = "...";

/// Renders normalized records using the display settings of a [`ReportConfig`].
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    max_content_length: Option<usize>,
}

impl ReportRenderer {
    /// Create a renderer from report configuration.
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            max_content_length: config.max_content_length,
        }
    }

    /// Override the content truncation length.
    pub fn with_max_content_length(mut self, max: Option<usize>) -> Self {
        self.max_content_length = max;
        self
    }

    /// Structured document with the persisted JSON layout. Never truncated.
    pub fn to_structured(&self, record: &NormalizedRecord) -> StructuredReport {
        structured::to_structured(record)
    }

    /// Pretty-printed JSON of [`to_structured`](Self::to_structured).
    ///
    /// # Errors
    ///
    /// Returns the serializer error, which cannot occur for well-formed records.
    pub fn to_json(&self, record: &NormalizedRecord) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_structured(record))
    }

    /// Complete HTML report stamped with the current local time.
    ///
    /// `title` defaults to [`html::default_title`].
    pub fn to_html(&self, record: &NormalizedRecord, title: Option<&str>) -> String {
        self.to_html_at(record, title, Local::now())
    }

    /// Complete HTML report stamped with `generated_at`.
    pub fn to_html_at(
        &self,
        record: &NormalizedRecord,
        title: Option<&str>,
        generated_at: DateTime<Local>,
    ) -> String {
        let title = title
            .map(str::to_owned)
            .unwrap_or_else(|| html::default_title(record));
        html::render(record, &title, self.max_content_length, generated_at)
    }

    /// Console summary: banner, answer, results and follow-up questions.
    pub fn console_summary(&self, record: &NormalizedRecord) -> String {
        console::render_record(record, self.max_content_length)
    }

    /// Console view of a quality report.
    pub fn quality_summary(&self, report: &QualityReport) -> String {
        console::render_quality(report)
    }
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new(&ReportConfig::default())
    }
}

/// Truncate `text` to at most `max_chars` characters plus [`ELLIPSIS`].
///
/// Counts characters rather than bytes so multi-byte text is never split.
pub fn truncate_content(text: &str, max_chars: Option<usize>) -> std::borrow::Cow<'_, str> {
    let Some(max) = max_chars else {
        return text.into();
    };
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]).into(),
        None => text.into(),
    }
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
