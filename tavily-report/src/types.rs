//! Core types: normalized search records, quality reports and history entries.

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Placeholder used for absent text fields and unknown response times.
pub const NOT_AVAILABLE: &str = "N/A";

/// Title given to results that arrive without one.
pub const UNTITLED: &str = "untitled";

/// Provider-reported response time, or the `"N/A"` sentinel.
///
/// Serializes as a bare JSON number or the string `"N/A"`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ResponseTime {
    /// Response time in seconds.
    Seconds(f64),
    /// The provider did not report a usable response time.
    #[default]
    NotAvailable,
}

impl ResponseTime {
    /// Returns the number of seconds, if known.
    pub fn seconds(&self) -> Option<f64> {
        match self {
            Self::Seconds(s) => Some(*s),
            Self::NotAvailable => None,
        }
    }
}

impl fmt::Display for ResponseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds(s) => write!(f, "{s}"),
            Self::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for ResponseTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Seconds(s) => serializer.serialize_f64(*s),
            Self::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for ResponseTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(crate::normalize::coerce_response_time(value.as_ref()))
    }
}

/// A single search result after sanitization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    /// 1-based position among the kept results.
    pub rank: usize,
    pub title: String,
    pub url: String,
    /// Full original content; truncation only happens in rendered views.
    pub content: String,
    /// Relevance score clamped to `[0.0, 1.0]`.
    pub score: f64,
}

/// Canonical form of one search response.
///
/// Only [`normalize`](crate::normalize::normalize) constructs these from
/// untrusted input; downstream code relies on its defaults and clamping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub query: String,
    pub response_time: ResponseTime,
    /// `None` means the provider gave no answer; `Some("")` is an empty one.
    pub answer: Option<String>,
    pub results: Vec<NormalizedResult>,
    pub follow_up_questions: Vec<String>,
}

impl NormalizedRecord {
    /// Number of results in this record.
    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// Returns the answer only when it is present and non-empty.
    pub fn non_empty_answer(&self) -> Option<&str> {
        self.answer.as_deref().filter(|a| !a.is_empty())
    }
}

/// Counts of results per quality bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreDistribution {
    /// Scores strictly above 0.7.
    #[serde(rename = "高质量(>0.7)")]
    pub high: usize,
    /// Scores in `[0.4, 0.7]`.
    #[serde(rename = "中等质量(0.4-0.7)")]
    pub medium: usize,
    /// Scores strictly below 0.4.
    #[serde(rename = "低质量(<0.4)")]
    pub low: usize,
}

impl ScoreDistribution {
    /// Total number of results counted across all buckets.
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Score statistics derived from a [`NormalizedRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    #[serde(rename = "结果总数")]
    pub result_count: usize,
    /// Arithmetic mean of the clamped scores, unrounded.
    #[serde(rename = "平均评分")]
    pub average_score: f64,
    #[serde(rename = "评分分布")]
    pub distribution: ScoreDistribution,
    #[serde(rename = "响应时间")]
    pub response_time: ResponseTime,
}

/// One executed query in the session ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    /// Capture time of the search.
    pub timestamp: DateTime<Local>,
    #[serde(rename = "results_count")]
    pub result_count: usize,
    pub response_time: ResponseTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_time_serializes_number_or_sentinel() {
        let known = serde_json::to_value(ResponseTime::Seconds(1.25)).expect("serialize");
        assert_eq!(known, serde_json::json!(1.25));

        let unknown = serde_json::to_value(ResponseTime::NotAvailable).expect("serialize");
        assert_eq!(unknown, serde_json::json!("N/A"));
    }

    #[test]
    fn response_time_deserializes_sentinel_and_null() {
        let na: ResponseTime = serde_json::from_str("\"N/A\"").expect("deserialize");
        assert_eq!(na, ResponseTime::NotAvailable);

        let null: ResponseTime = serde_json::from_str("null").expect("deserialize");
        assert_eq!(null, ResponseTime::NotAvailable);

        let secs: ResponseTime = serde_json::from_str("0.5").expect("deserialize");
        assert_eq!(secs, ResponseTime::Seconds(0.5));
    }

    #[test]
    fn response_time_display() {
        assert_eq!(ResponseTime::Seconds(1.5).to_string(), "1.5");
        assert_eq!(ResponseTime::NotAvailable.to_string(), "N/A");
        assert_eq!(ResponseTime::Seconds(2.0).seconds(), Some(2.0));
        assert_eq!(ResponseTime::NotAvailable.seconds(), None);
    }

    #[test]
    fn non_empty_answer_filters_empty_strings() {
        let mut record = NormalizedRecord {
            query: "q".into(),
            response_time: ResponseTime::NotAvailable,
            answer: Some(String::new()),
            results: vec![],
            follow_up_questions: vec![],
        };
        assert!(record.non_empty_answer().is_none());
        record.answer = Some("yes".into());
        assert_eq!(record.non_empty_answer(), Some("yes"));
        record.answer = None;
        assert!(record.non_empty_answer().is_none());
    }

    #[test]
    fn quality_report_uses_localized_keys() {
        let report = QualityReport {
            result_count: 3,
            average_score: 0.5,
            distribution: ScoreDistribution {
                high: 1,
                medium: 1,
                low: 1,
            },
            response_time: ResponseTime::Seconds(0.8),
        };
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["结果总数"], 3);
        assert_eq!(json["评分分布"]["高质量(>0.7)"], 1);
        assert_eq!(json["评分分布"]["中等质量(0.4-0.7)"], 1);
        assert_eq!(json["评分分布"]["低质量(<0.4)"], 1);
        assert_eq!(json["响应时间"], 0.8);
        assert_eq!(report.distribution.total(), 3);
    }

    #[test]
    fn history_entry_uses_results_count_key() {
        let entry = HistoryEntry {
            query: "rust".into(),
            timestamp: Local::now(),
            result_count: 4,
            response_time: ResponseTime::NotAvailable,
        };
        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json["results_count"], 4);
        assert_eq!(json["response_time"], "N/A");
        assert!(json["timestamp"].is_string());

        let decoded: HistoryEntry = serde_json::from_value(json).expect("deserialize");
        assert_eq!(decoded, entry);
    }
}
