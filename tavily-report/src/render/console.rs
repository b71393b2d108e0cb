//! Plain-text views for terminal output.

use super::truncate_content;
use crate::types::{NormalizedRecord, QualityReport};

const BANNER_WIDTH: usize = 60;
const RULE_WIDTH: usize = 50;

/// Banner, AI answer, results and follow-up questions.
pub(crate) fn render_record(
    record: &NormalizedRecord,
    max_content_length: Option<usize>,
) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let rule = "-".repeat(RULE_WIDTH);

    let mut out = String::new();
    out.push_str(&format!("{banner}\n"));
    out.push_str(&format!("查询: {}\n", record.query));
    out.push_str(&format!("用时: {}秒\n", record.response_time));
    out.push_str(&format!("结果: {}条\n", record.result_count()));
    out.push_str(&format!("{banner}\n"));

    if let Some(answer) = record.non_empty_answer() {
        out.push_str(&format!("\nAI答案:\n{answer}\n{rule}\n"));
    }

    for result in &record.results {
        out.push_str(&format!("\n[{}] {}\n", result.rank, result.title));
        out.push_str(&format!("   {}\n", result.url));
        out.push_str(&format!("   评分: {:.3}\n", result.score));
        if !result.content.is_empty() {
            out.push_str(&format!(
                "   {}\n",
                truncate_content(&result.content, max_content_length)
            ));
        }
        out.push_str(&format!("{rule}\n"));
    }

    if !record.follow_up_questions.is_empty() {
        out.push_str("\n相关问题:\n");
        for (i, question) in record.follow_up_questions.iter().enumerate() {
            out.push_str(&format!("   {}. {question}\n", i + 1));
        }
    }
    out
}

/// Quality statistics, one per line.
pub(crate) fn render_quality(report: &QualityReport) -> String {
    format!(
        "搜索质量分析:\n   结果总数: {}\n   平均评分: {:.3}\n   高质量结果: {}\n   中等质量结果: {}\n   低质量结果: {}\n   响应时间: {}\n",
        report.result_count,
        report.average_score,
        report.distribution.high,
        report.distribution.medium,
        report.distribution.low,
        report.response_time,
    )
}
