//! Structured (JSON) form of a normalized record.
//!
//! The persisted key names are fixed for compatibility with reports written
//! by earlier versions of the tool; the Rust field names are free.

use crate::types::{NormalizedRecord, ResponseTime};
use serde::{Deserialize, Serialize};

/// Top-level structured report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredReport {
    #[serde(rename = "搜索信息")]
    pub search_info: SearchInfo,
    /// Serialized as `null` when the provider gave no answer.
    #[serde(rename = "AI答案")]
    pub answer: Option<String>,
    #[serde(rename = "搜索结果")]
    pub results: Vec<StructuredResult>,
    #[serde(rename = "跟进问题")]
    pub follow_up_questions: Vec<String>,
}

/// Search metadata section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchInfo {
    #[serde(rename = "查询")]
    pub query: String,
    #[serde(rename = "响应时间")]
    pub response_time: ResponseTime,
    #[serde(rename = "结果数量")]
    pub result_count: usize,
}

/// One enumerated result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredResult {
    #[serde(rename = "序号")]
    pub rank: usize,
    #[serde(rename = "标题")]
    pub title: String,
    #[serde(rename = "链接")]
    pub url: String,
    #[serde(rename = "评分")]
    pub score: f64,
    #[serde(rename = "内容摘要")]
    pub content: String,
}

/// Build the structured document for `record`.
pub fn to_structured(record: &NormalizedRecord) -> StructuredReport {
    StructuredReport {
        search_info: SearchInfo {
            query: record.query.clone(),
            response_time: record.response_time,
            result_count: record.result_count(),
        },
        answer: record.answer.clone(),
        results: record
            .results
            .iter()
            .map(|r| StructuredResult {
                rank: r.rank,
                title: r.title.clone(),
                url: r.url.clone(),
                score: r.score,
                content: r.content.clone(),
            })
            .collect(),
        follow_up_questions: record.follow_up_questions.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    fn sample() -> NormalizedRecord {
        normalize(&json!({
            "query": "测试查询",
            "response_time": 1.23,
            "answer": "这是AI的回答",
            "results": [
                {"title": "测试标题1", "url": "https://example.com/1", "content": "测试内容1", "score": 0.85},
                {"title": "测试标题2", "url": "https://example.com/2", "content": "测试内容2", "score": 0.65},
            ],
            "follow_up_questions": ["相关问题1", "相关问题2"],
        }))
    }

    #[test]
    fn sections_and_keys_match_persisted_layout() {
        let json = serde_json::to_value(to_structured(&sample())).expect("serialize");
        assert_eq!(json["搜索信息"]["查询"], "测试查询");
        assert_eq!(json["搜索信息"]["响应时间"], 1.23);
        assert_eq!(json["搜索信息"]["结果数量"], 2);
        assert_eq!(json["AI答案"], "这是AI的回答");
        assert_eq!(json["搜索结果"][0]["序号"], 1);
        assert_eq!(json["搜索结果"][0]["标题"], "测试标题1");
        assert_eq!(json["搜索结果"][0]["链接"], "https://example.com/1");
        assert_eq!(json["搜索结果"][0]["评分"], 0.85);
        assert_eq!(json["搜索结果"][1]["内容摘要"], "测试内容2");
        assert_eq!(json["跟进问题"], json!(["相关问题1", "相关问题2"]));
    }

    #[test]
    fn key_order_is_stable() {
        let text = serde_json::to_string(&to_structured(&sample())).expect("serialize");
        let positions: Vec<usize> = ["搜索信息", "AI答案", "搜索结果", "跟进问题"]
            .iter()
            .map(|k| text.find(k).expect("key present"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let result_keys: Vec<usize> = ["序号", "标题", "链接", "评分", "内容摘要"]
            .iter()
            .map(|k| text.find(k).expect("key present"))
            .collect();
        assert!(result_keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn absent_answer_is_null_not_empty() {
        let record = normalize(&json!({"query": "q"}));
        let json = serde_json::to_value(to_structured(&record)).expect("serialize");
        assert!(json["AI答案"].is_null());
        assert!(json.as_object().expect("object").contains_key("AI答案"));

        let empty = normalize(&json!({"query": "q", "answer": ""}));
        let json = serde_json::to_value(to_structured(&empty)).expect("serialize");
        assert_eq!(json["AI答案"], "");
    }

    #[test]
    fn unknown_response_time_is_sentinel() {
        let record = normalize(&json!({"query": "q"}));
        let json = serde_json::to_value(to_structured(&record)).expect("serialize");
        assert_eq!(json["搜索信息"]["响应时间"], "N/A");
    }

    #[test]
    fn reparse_preserves_counts_ranks_and_scores() {
        let record = normalize(&json!({"results": [
            {"score": 0.123_456_789_012_345_6},
            "skip me",
            {"score": 0.999_999_999_999},
            {"score": 7},
        ]}));
        let report = to_structured(&record);
        let text = serde_json::to_string_pretty(&report).expect("serialize");
        let parsed: StructuredReport = serde_json::from_str(&text).expect("deserialize");

        assert_eq!(parsed, report);
        assert_eq!(parsed.search_info.result_count, 3);
        let ranks: Vec<usize> = parsed.results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        for (parsed, original) in parsed.results.iter().zip(&record.results) {
            assert_eq!(parsed.score.to_bits(), original.score.to_bits());
        }
    }

    #[test]
    fn pretty_json_keeps_non_ascii() {
        let text = serde_json::to_string_pretty(&to_structured(&sample())).expect("serialize");
        assert!(text.contains("测试查询"));
        assert!(text.contains("\n  \"搜索信息\""));
    }
}
