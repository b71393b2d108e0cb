//! Sanitization of raw search responses into [`NormalizedRecord`]s.
//!
//! [`normalize`] is total: whatever shape the provider returns, it produces
//! a record with defaulted text fields, clamped scores and contiguous ranks.
//! This is the only place defaults are applied.

use crate::types::{NormalizedRecord, NormalizedResult, ResponseTime, NOT_AVAILABLE, UNTITLED};
use serde_json::{Map, Value};

/// Lower bound of a normalized score.
pub const MIN_SCORE: f64 = 0.0;
/// Upper bound of a normalized score.
pub const MAX_SCORE: f64 = 1.0;

/// Coerce an untrusted response into its canonical form.
///
/// Non-object responses normalize to an empty record with placeholder
/// query. Non-object entries in `results` are skipped; ranks are assigned
/// to the kept entries as `1..=n`.
///
/// # Examples
///
/// ```
/// let raw = serde_json::json!({
///     "query": "rust",
///     "results": [{"title": "Rust", "url": "https://rust-lang.org", "score": "1.7"}],
/// });
/// let record = tavily_report::normalize(&raw);
/// assert_eq!(record.results[0].rank, 1);
/// assert_eq!(record.results[0].score, 1.0);
/// assert_eq!(record.results[0].content, "");
/// ```
pub fn normalize(raw: &Value) -> NormalizedRecord {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    let query = obj
        .get("query")
        .and_then(text_of)
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned());

    let response_time = coerce_response_time(obj.get("response_time"));
    let answer = obj.get("answer").and_then(text_of);

    let results: Vec<NormalizedResult> = obj
        .get("results")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_object)
                .enumerate()
                .map(|(index, entry)| normalize_result(index + 1, entry))
                .collect()
        })
        .unwrap_or_default();

    let follow_up_questions: Vec<String> = obj
        .get("follow_up_questions")
        .and_then(Value::as_array)
        .map(|questions| questions.iter().filter_map(text_of).collect())
        .unwrap_or_default();

    let skipped = obj
        .get("results")
        .and_then(Value::as_array)
        .map_or(0, |entries| entries.len() - results.len());
    if skipped > 0 {
        tracing::debug!(skipped, "skipped non-object result entries");
    }

    NormalizedRecord {
        query,
        response_time,
        answer,
        results,
        follow_up_questions,
    }
}

fn normalize_result(rank: usize, entry: &Map<String, Value>) -> NormalizedResult {
    NormalizedResult {
        rank,
        title: entry
            .get("title")
            .and_then(text_of)
            .unwrap_or_else(|| UNTITLED.to_owned()),
        url: entry
            .get("url")
            .and_then(text_of)
            .unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
        content: entry.get("content").and_then(text_of).unwrap_or_default(),
        score: coerce_score(entry.get("score")),
    }
}

/// Parse and clamp a raw score.
///
/// JSON numbers and numeric strings are accepted and clamped to
/// `[0.0, 1.0]`; zero and below come out as positive `0.0`. Anything else
/// (null, booleans, unparsable text, NaN) becomes `0.0`.
pub fn coerce_score(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(score) if score <= MIN_SCORE => MIN_SCORE,
        Some(score) if !score.is_nan() => score.min(MAX_SCORE),
        _ => MIN_SCORE,
    }
}

/// Parse a raw response time; only finite, non-negative values are kept.
pub(crate) fn coerce_response_time(value: Option<&Value>) -> ResponseTime {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(seconds) if seconds.is_finite() && seconds >= 0.0 => {
            ResponseTime::Seconds(seconds.abs())
        }
        _ => ResponseTime::NotAvailable,
    }
}

/// Textual view of a scalar JSON value. Null, arrays and objects are absent.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl NormalizedRecord {
    /// Re-express this record in the provider's raw response shape.
    ///
    /// `normalize(&record.to_raw()) == record` for every normalized record.
    pub fn to_raw(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("query".into(), Value::String(self.query.clone()));
        obj.insert(
            "response_time".into(),
            serde_json::to_value(self.response_time).unwrap_or(Value::Null),
        );
        if let Some(answer) = &self.answer {
            obj.insert("answer".into(), Value::String(answer.clone()));
        }
        let results = self
            .results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "title": r.title,
                    "url": r.url,
                    "content": r.content,
                    "score": r.score,
                })
            })
            .collect();
        obj.insert("results".into(), Value::Array(results));
        obj.insert(
            "follow_up_questions".into(),
            Value::Array(
                self.follow_up_questions
                    .iter()
                    .cloned()
                    .map(Value::String)
                    .collect(),
            ),
        );
        Value::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_everything_yields_defaults() {
        let record = normalize(&json!({}));
        assert_eq!(record.query, "N/A");
        assert_eq!(record.response_time, ResponseTime::NotAvailable);
        assert!(record.answer.is_none());
        assert!(record.results.is_empty());
        assert!(record.follow_up_questions.is_empty());
    }

    #[test]
    fn non_object_response_is_absorbed() {
        for raw in [json!(null), json!("oops"), json!([1, 2, 3]), json!(42)] {
            let record = normalize(&raw);
            assert_eq!(record.query, "N/A");
            assert!(record.results.is_empty());
        }
    }

    #[test]
    fn null_query_and_results_default() {
        let record = normalize(&json!({"query": null, "results": null}));
        assert_eq!(record.query, "N/A");
        assert!(record.results.is_empty());
    }

    #[test]
    fn score_coercion_table() {
        let cases = [
            (json!(-5), 0.0),
            (json!("abc"), 0.0),
            (json!(null), 0.0),
            (json!(1.5), 1.0),
            (json!(0.65), 0.65),
            (json!(" 0.3 "), 0.3),
            (json!(true), 0.0),
            (json!("NaN"), 0.0),
            (json!("inf"), 1.0),
            (json!({"nested": 1}), 0.0),
        ];
        for (raw, expected) in cases {
            let score = coerce_score(Some(&raw));
            assert!(
                (score - expected).abs() < f64::EPSILON,
                "{raw} -> {score}, expected {expected}"
            );
        }
        assert!((coerce_score(None) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_zero_score_is_positive_zero() {
        let raw: Value = serde_json::from_str(r#"{"score": -0.0}"#).expect("parse");
        let score = coerce_score(raw.get("score"));
        assert_eq!(score.to_bits(), 0.0_f64.to_bits());
        assert!(coerce_score(Some(&json!("-0"))).is_sign_positive());
        assert!(coerce_score(Some(&json!("-inf"))).is_sign_positive());
    }

    #[test]
    fn result_fields_default() {
        let record = normalize(&json!({"results": [{}]}));
        let result = &record.results[0];
        assert_eq!(result.rank, 1);
        assert_eq!(result.title, "untitled");
        assert_eq!(result.url, "N/A");
        assert_eq!(result.content, "");
        assert!((result.score - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ranks_are_contiguous_after_skipping_malformed_entries() {
        let record = normalize(&json!({
            "results": [
                {"title": "a"},
                "not a mapping",
                null,
                {"title": "b"},
                42,
                {"title": "c"},
            ]
        }));
        let ranks: Vec<usize> = record.results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        let titles: Vec<&str> = record.results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn content_is_never_truncated() {
        let long = "x".repeat(10_000);
        let record = normalize(&json!({"results": [{"content": long}]}));
        assert_eq!(record.results[0].content.len(), 10_000);
    }

    #[test]
    fn response_time_coercion() {
        let cases = [
            (json!(1.2), ResponseTime::Seconds(1.2)),
            (json!(0), ResponseTime::Seconds(0.0)),
            (json!("2.5"), ResponseTime::Seconds(2.5)),
            (json!("N/A"), ResponseTime::NotAvailable),
            (json!(-1.0), ResponseTime::NotAvailable),
            (json!(null), ResponseTime::NotAvailable),
            (json!([1.0]), ResponseTime::NotAvailable),
        ];
        for (raw, expected) in cases {
            assert_eq!(coerce_response_time(Some(&raw)), expected, "{raw}");
        }
        match coerce_response_time(Some(&json!("-0"))) {
            ResponseTime::Seconds(seconds) => assert!(seconds.is_sign_positive()),
            other => panic!("expected seconds, got {other:?}"),
        }
    }

    #[test]
    fn empty_answer_is_distinct_from_absent() {
        assert_eq!(normalize(&json!({"answer": ""})).answer, Some(String::new()));
        assert_eq!(normalize(&json!({"answer": null})).answer, None);
        assert_eq!(normalize(&json!({})).answer, None);
    }

    #[test]
    fn follow_up_questions_keep_order_and_duplicates() {
        let record = normalize(&json!({
            "follow_up_questions": ["why?", "why?", null, {"x": 1}, "how"]
        }));
        assert_eq!(record.follow_up_questions, vec!["why?", "why?", "how"]);
    }

    #[test]
    fn scalar_text_fields_are_stringified() {
        let record = normalize(&json!({"query": 42, "results": [{"title": false, "url": 7}]}));
        assert_eq!(record.query, "42");
        assert_eq!(record.results[0].title, "false");
        assert_eq!(record.results[0].url, "7");
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = json!({
            "query": "idempotent",
            "response_time": "0.75",
            "answer": "",
            "results": [
                {"title": null, "url": "https://a", "content": "c", "score": "2"},
                "junk",
                {"title": "b", "score": 0.123_456_789},
            ],
            "follow_up_questions": ["q1", 3],
        });
        let once = normalize(&raw);
        let twice = normalize(&once.to_raw());
        assert_eq!(once, twice);
    }

    #[test]
    fn idempotent_for_empty_record() {
        let once = normalize(&json!(null));
        assert_eq!(normalize(&once.to_raw()), once);
    }
}
