//! Self-contained HTML report.
//!
//! Every string that originates from the search response, and the report
//! title, goes through [`escape_html`] before interpolation. Result content
//! comes from the open web and must be treated as hostile.

use super::{escape_html, truncate_content};
use crate::types::{NormalizedRecord, NormalizedResult};
use chrono::{DateTime, Local};

/// Embedded stylesheet.
const STYLE: &str = r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f8f9fa;
        }
        .header {
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            padding: 30px;
            border-radius: 10px;
            margin-bottom: 30px;
            box-shadow: 0 4px 6px rgba(0,0,0,0.1);
        }
        .header h1 { margin: 0 0 10px 0; font-size: 2.5em; }
        .meta-info {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 20px;
            margin: 20px 0;
            padding: 20px;
            background: white;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        .meta-item { text-align: center; }
        .meta-label { font-weight: bold; color: #666; font-size: 0.9em; }
        .meta-value { font-size: 1.2em; color: #333; margin-top: 5px; }
        .ai-answer {
            background: #e8f5e8;
            border-left: 4px solid #28a745;
            padding: 20px;
            margin: 20px 0;
            border-radius: 5px;
        }
        .ai-answer h2 { color: #28a745; margin-top: 0; }
        .results-section {
            background: white;
            padding: 20px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
            margin: 20px 0;
        }
        .result-item { border-bottom: 1px solid #eee; padding: 20px 0; }
        .result-item:last-child { border-bottom: none; }
        .result-title { margin: 0 0 10px 0; color: #1a73e8; }
        .result-title a { color: inherit; text-decoration: none; }
        .result-title a:hover { text-decoration: underline; }
        .result-number {
            background: #1a73e8;
            color: white;
            padding: 2px 8px;
            border-radius: 12px;
            font-size: 0.8em;
            margin-right: 10px;
        }
        .result-meta { color: #666; font-size: 0.9em; margin: 5px 0; }
        .result-score {
            background: #f0f8ff;
            color: #1a73e8;
            padding: 2px 8px;
            border-radius: 4px;
            margin-right: 10px;
        }
        .result-url { color: #666; word-break: break-all; }
        .result-content { margin-top: 10px; line-height: 1.5; color: #444; }
        .follow-up-questions {
            background: #fff3cd;
            border-left: 4px solid #ffc107;
            padding: 20px;
            margin: 20px 0;
            border-radius: 5px;
        }
        .follow-up-questions h2 { color: #856404; margin-top: 0; }
        .follow-up-questions ul { margin: 10px 0; padding-left: 20px; }
        .follow-up-questions li { margin: 8px 0; color: #856404; }
        .footer {
            text-align: center;
            color: #666;
            font-size: 0.9em;
            margin-top: 40px;
            padding: 20px;
            border-top: 1px solid #eee;
        }
        @media (max-width: 768px) {
            body { padding: 10px; }
            .header h1 { font-size: 2em; }
            .meta-info { grid-template-columns: 1fr; }
        }
"#;

/// Title used when the caller does not supply one.
pub fn default_title(record: &NormalizedRecord) -> String {
    format!("Tavily搜索报告 - {}", record.query)
}

/// Render the full document.
pub(crate) fn render(
    record: &NormalizedRecord,
    title: &str,
    max_content_length: Option<usize>,
    generated_at: DateTime<Local>,
) -> String {
    let title = escape_html(title);
    let generated = generated_at.format("%Y-%m-%d %H:%M:%S").to_string();

    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!("    <title>{title}</title>\n"));
    html.push_str(&format!("    <style>{STYLE}    </style>\n"));
    html.push_str("</head>\n<body>\n");

    html.push_str(&format!(
        "    <div class=\"header\">\n        <h1>{title}</h1>\n        <p>基于Tavily AI搜索引擎的智能搜索报告</p>\n    </div>\n"
    ));

    html.push_str("    <div class=\"meta-info\">\n");
    push_meta_item(&mut html, "🔍 搜索查询", &escape_html(&record.query));
    push_meta_item(
        &mut html,
        "⏱️ 响应时间",
        &format!("{}秒", escape_html(&record.response_time.to_string())),
    );
    push_meta_item(
        &mut html,
        "📊 结果数量",
        &format!("{}条", record.result_count()),
    );
    push_meta_item(&mut html, "📅 生成时间", &generated);
    html.push_str("    </div>\n");

    if let Some(answer) = record.non_empty_answer() {
        html.push_str(&format!(
            "    <div class=\"ai-answer\"><h2>🤖 AI智能答案</h2><p>{}</p></div>\n",
            escape_html(answer)
        ));
    }

    html.push_str("    <div class=\"results-section\">\n        <h2>🔍 搜索结果</h2>\n");
    for result in &record.results {
        push_result(&mut html, result, max_content_length);
    }
    html.push_str("    </div>\n");

    if !record.follow_up_questions.is_empty() {
        html.push_str("    <div class=\"follow-up-questions\">\n        <h2>💡 相关问题</h2>\n        <ul>\n");
        for question in &record.follow_up_questions {
            html.push_str(&format!("            <li>{}</li>\n", escape_html(question)));
        }
        html.push_str("        </ul>\n    </div>\n");
    }

    html.push_str(&format!(
        "    <div class=\"footer\">\n        <p>📄 报告生成时间: {generated}</p>\n        <p>🔧 由 Tavily Tools 强力驱动</p>\n    </div>\n"
    ));
    html.push_str("</body>\n</html>\n");
    html
}

fn push_meta_item(html: &mut String, label: &str, value: &str) {
    html.push_str(&format!(
        "        <div class=\"meta-item\">\n            <div class=\"meta-label\">{label}</div>\n            <div class=\"meta-value\">{value}</div>\n        </div>\n"
    ));
}

fn push_result(html: &mut String, result: &NormalizedResult, max_content_length: Option<usize>) {
    let url = escape_html(&result.url);
    let content = escape_html(&truncate_content(&result.content, max_content_length));
    html.push_str(&format!(
        r#"        <div class="result-item">
            <h3 class="result-title">
                <span class="result-number">[{rank}]</span>
                <a href="{href}" target="_blank" rel="noopener noreferrer">{title}</a>
            </h3>
            <div class="result-meta">
                <span class="result-score">评分: {score:.3}</span>
                <span class="result-url">{url}</span>
            </div>
            <div class="result-content">{content}</div>
        </div>
"#,
        rank = result.rank,
        href = safe_href(&result.url),
        title = escape_html(&result.title),
        score = result.score,
    ));
}

/// Only http(s) URLs become live links; anything else points at `#`.
fn safe_href(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => escape_html(raw),
        _ => "#".to_owned(),
    }
}
