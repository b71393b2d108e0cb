//! Application configuration.
//!
//! Loaded from `config.toml` (see [`crate::app_dirs::config_file`]) and then
//! overridden from environment variables. Every field has a default, so an
//! empty or missing file is valid apart from the API key.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tavily_report::tavily::DEFAULT_BASE_URL;
use tavily_report::{ReportConfig, SearchDepth, SearchOptions, TavilyConfig};
use tracing::level_filters::LevelFilter;

/// Placeholder key shipped in configuration templates.
pub const TEMPLATE_API_KEY: &str = "your_tavily_api_key_here";

/// Keys shorter than this are accepted with a warning.
const MIN_API_KEY_LEN: usize = 20;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tavily: TavilySection,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// `[tavily]` provider and search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TavilySection {
    /// Tavily API key. Prefer `TAVILY_API_KEY` over storing it in the file.
    pub api_key: String,
    pub base_url: String,
    /// Query used when no query is given on the command line.
    pub default_query: String,
    pub max_results: usize,
    pub timeout_seconds: u64,
    pub search_depth: SearchDepth,
}

impl Default for TavilySection {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            default_query: "deepseek".to_owned(),
            max_results: 10,
            timeout_seconds: 30,
            search_depth: SearchDepth::Basic,
        }
    }
}

/// `[output]` artifact settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub results_dir: PathBuf,
    pub enable_html: bool,
    /// Characters of result content shown in console and HTML views.
    pub max_content_length: Option<usize>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("./results"),
            enable_html: true,
            max_content_length: Some(150),
        }
    }
}

/// `[logging]` settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for this application's crates (`error`..`trace`).
    pub level: String,
    /// Optional log file, written in addition to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    /// Load the explicit file, or the default file when it exists, then
    /// apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file is missing, or any
    /// file cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = crate::app_dirs::config_file();
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`.
    ///
    /// Unparseable numeric values are ignored and the previous value kept.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("TAVILY_API_KEY") {
            self.tavily.api_key = key.trim().to_owned();
        }
        if let Some(query) = lookup("DEFAULT_SEARCH_QUERY") {
            self.tavily.default_query = query;
        }
        if let Some(dir) = lookup("RESULTS_SAVE_PATH") {
            self.output.results_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("MAX_SEARCH_RESULTS") {
            match raw.trim().parse() {
                Ok(n) => self.tavily.max_results = n,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid MAX_SEARCH_RESULTS"),
            }
        }
        if let Some(raw) = lookup("SEARCH_TIMEOUT") {
            match raw.trim().parse() {
                Ok(secs) => self.tavily.timeout_seconds = secs,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid SEARCH_TIMEOUT"),
            }
        }
        if let Some(raw) = lookup("ENABLE_HTML_REPORTS") {
            self.output.enable_html = parse_flag(&raw);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(path) = lookup("LOG_PATH") {
            self.logging.file = Some(PathBuf::from(path));
        }
    }

    /// Validates this configuration.
    ///
    /// Checks:
    /// - the API key is set and is not the template placeholder
    /// - search options are within the provider's limits
    /// - the log level is recognised
    ///
    /// Returns non-fatal warnings, such as an unusually short API key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] describing the first failed check, or
    /// [`AppError::Search`] for out-of-range search options.
    pub fn validate(&self) -> Result<Vec<String>> {
        let key = self.tavily.api_key.as_str();
        if key.is_empty() {
            return Err(AppError::Config(
                "TAVILY_API_KEY is not set; add it to the environment or [tavily] api_key".into(),
            ));
        }
        if key == TEMPLATE_API_KEY {
            return Err(AppError::Config(
                "TAVILY_API_KEY is still the template placeholder".into(),
            ));
        }

        self.search_options().validate()?;
        self.report_config()
            .validate()
            .map_err(|e| AppError::Config(e.0))?;
        if self.level_filter().is_none() {
            return Err(AppError::Config(format!(
                "unknown log level {:?}",
                self.logging.level
            )));
        }

        let mut warnings = Vec::new();
        if key.chars().count() < MIN_API_KEY_LEN {
            tracing::warn!("API key looks too short");
            warnings.push("API key looks too short; check the configuration".to_owned());
        }
        Ok(warnings)
    }

    /// Configured log level, if recognised.
    pub fn level_filter(&self) -> Option<LevelFilter> {
        self.logging.level.trim().parse().ok()
    }

    /// The API key with all but its last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.tavily.api_key.chars().collect();
        let tail: String = if chars.len() > 4 {
            chars[chars.len() - 4..].iter().collect()
        } else {
            "****".to_owned()
        };
        format!("{}...{tail}", "*".repeat(8))
    }

    /// Human-readable summary, one setting per line.
    pub fn display_lines(&self, show_sensitive: bool) -> Vec<String> {
        let key = if show_sensitive {
            self.tavily.api_key.clone()
        } else {
            self.masked_api_key()
        };
        let results_dir = std::path::absolute(&self.output.results_dir)
            .unwrap_or_else(|_| self.output.results_dir.clone());
        let content_length = self
            .output
            .max_content_length
            .map_or_else(|| "不截断".to_owned(), |n| n.to_string());

        vec![
            format!("API密钥: {key}"),
            format!("API地址: {}", self.tavily.base_url),
            format!("默认搜索: {}", self.tavily.default_query),
            format!("保存路径: {}", results_dir.display()),
            format!("最大结果数: {}", self.tavily.max_results),
            format!("搜索超时: {}秒", self.tavily.timeout_seconds),
            format!("搜索深度: {}", self.tavily.search_depth),
            format!(
                "HTML报告: {}",
                if self.output.enable_html { "启用" } else { "禁用" }
            ),
            format!("内容截断: {content_length}"),
            format!("日志级别: {}", self.logging.level),
            format!(
                "日志文件: {}",
                self.logging
                    .file
                    .as_ref()
                    .map_or_else(|| "无".to_owned(), |p| p.display().to_string())
            ),
        ]
    }

    /// Settings for the report pipeline.
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            save_dir: self.output.results_dir.clone(),
            enable_html: self.output.enable_html,
            max_content_length: self.output.max_content_length,
            ..ReportConfig::default()
        }
    }

    /// Options sent with every search.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_results: self.tavily.max_results,
            timeout_seconds: self.tavily.timeout_seconds,
            search_depth: self.tavily.search_depth,
            ..SearchOptions::default()
        }
    }

    /// Connection settings for the Tavily client.
    pub fn tavily_config(&self) -> TavilyConfig {
        TavilyConfig::new(self.tavily.api_key.clone()).with_base_url(self.tavily.base_url.clone())
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn with_key(key: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.tavily.api_key = key.to_owned();
        config
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.tavily.base_url, "https://api.tavily.com");
        assert_eq!(config.tavily.default_query, "deepseek");
        assert_eq!(config.tavily.max_results, 10);
        assert_eq!(config.tavily.timeout_seconds, 30);
        assert_eq!(config.output.results_dir, PathBuf::from("./results"));
        assert!(config.output.enable_html);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AppConfig::default();
        config.apply_overrides_from(lookup(&[
            ("TAVILY_API_KEY", " tvly-abcdefghijklmnopqrstuvwxyz "),
            ("DEFAULT_SEARCH_QUERY", "rust"),
            ("RESULTS_SAVE_PATH", "/tmp/out"),
            ("MAX_SEARCH_RESULTS", "5"),
            ("SEARCH_TIMEOUT", "12"),
            ("ENABLE_HTML_REPORTS", "off"),
            ("LOG_LEVEL", "DEBUG"),
            ("LOG_PATH", "/tmp/tavily.log"),
        ]));
        assert_eq!(config.tavily.api_key, "tvly-abcdefghijklmnopqrstuvwxyz");
        assert_eq!(config.tavily.default_query, "rust");
        assert_eq!(config.output.results_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.tavily.max_results, 5);
        assert_eq!(config.tavily.timeout_seconds, 12);
        assert!(!config.output.enable_html);
        assert_eq!(config.logging.level, "DEBUG");
        assert_eq!(config.level_filter(), Some(LevelFilter::DEBUG));
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/tavily.log")));
    }

    #[test]
    fn invalid_numeric_env_keeps_previous_value() {
        let mut config = AppConfig::default();
        config.tavily.max_results = 7;
        config.apply_overrides_from(lookup(&[
            ("MAX_SEARCH_RESULTS", "many"),
            ("SEARCH_TIMEOUT", "-3"),
        ]));
        assert_eq!(config.tavily.max_results, 7);
        assert_eq!(config.tavily.timeout_seconds, 30);
    }

    #[test]
    fn html_flag_values() {
        for on in ["true", "1", "YES", "On"] {
            assert!(parse_flag(on), "{on}");
        }
        for off in ["false", "0", "no", "", "maybe"] {
            assert!(!parse_flag(off), "{off}");
        }
    }

    #[test]
    fn validate_rejects_missing_key() {
        let err = AppConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("TAVILY_API_KEY"));
    }

    #[test]
    fn validate_rejects_template_key() {
        let err = with_key(TEMPLATE_API_KEY).validate().unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn short_key_only_warns() {
        let warnings = with_key("tvly-short").validate().expect("valid");
        assert_eq!(warnings.len(), 1);

        let warnings = with_key("tvly-abcdefghijklmnopqrstuvwxyz")
            .validate()
            .expect("valid");
        assert!(warnings.is_empty());
    }

    #[test]
    fn validate_checks_search_limits_and_level() {
        let mut config = with_key("tvly-abcdefghijklmnopqrstuvwxyz");
        config.tavily.max_results = 0;
        assert!(config.validate().is_err());

        let mut config = with_key("tvly-abcdefghijklmnopqrstuvwxyz");
        config.logging.level = "loud".into();
        assert!(config.validate().unwrap_err().to_string().contains("log level"));
    }

    #[test]
    fn masked_key_shows_last_four() {
        assert_eq!(
            with_key("tvly-abcdefghijklmnopqrstuvwxyz").masked_api_key(),
            "********...wxyz"
        );
        assert_eq!(with_key("abc").masked_api_key(), "********...****");
    }

    #[test]
    fn display_lines_hide_key_unless_asked() {
        let config = with_key("tvly-abcdefghijklmnopqrstuvwxyz");
        let hidden = config.display_lines(false).join("\n");
        assert!(!hidden.contains("tvly-abcdefghijklmnopqrstuvwxyz"));
        assert!(hidden.contains("********...wxyz"));

        let shown = config.display_lines(true).join("\n");
        assert!(shown.contains("tvly-abcdefghijklmnopqrstuvwxyz"));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [tavily]
            max_results = 3
            search_depth = "advanced"

            [output]
            enable_html = false
            "#,
        )
        .expect("parse");
        assert_eq!(config.tavily.max_results, 3);
        assert_eq!(config.tavily.search_depth, SearchDepth::Advanced);
        assert_eq!(config.tavily.timeout_seconds, 30);
        assert!(!config.output.enable_html);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn from_file_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tavily\nmax_results = ").expect("write");
        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn load_rejects_missing_explicit_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn derived_pipeline_settings() {
        let mut config = with_key("tvly-abcdefghijklmnopqrstuvwxyz");
        config.output.results_dir = PathBuf::from("/data/out");
        config.output.enable_html = false;
        config.tavily.max_results = 4;
        config.tavily.base_url = "http://localhost:9000".into();

        let report = config.report_config();
        assert_eq!(report.save_dir, PathBuf::from("/data/out"));
        assert!(!report.enable_html);

        let options = config.search_options();
        assert_eq!(options.max_results, 4);
        assert_eq!(options.timeout_seconds, 30);

        assert_eq!(config.tavily_config().base_url, "http://localhost:9000");
    }
}
