//! Report configuration with sensible defaults.
//!
//! [`ReportConfig`] is passed by value into the [`ArtifactWriter`],
//! [`ReportRenderer`] and [`SessionLedger`] constructors. There is no
//! process-wide configuration state.
//!
//! [`ArtifactWriter`]: crate::writer::ArtifactWriter
//! [`ReportRenderer`]: crate::render::ReportRenderer
//! [`SessionLedger`]: crate::ledger::SessionLedger

use crate::error::ConfigError;
use std::path::PathBuf;

/// Directory used when the configured save directory cannot be created.
pub const FALLBACK_DIR_NAME: &str = "tavily_results";

/// Configuration for rendering and persisting reports.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Where JSON/HTML artifacts and history exports are written.
    pub save_dir: PathBuf,
    /// Used when `save_dir` cannot be created. Relative paths resolve
    /// against the current working directory.
    pub fallback_dir: PathBuf,
    /// Whether HTML reports may be generated at all.
    pub enable_html: bool,
    /// Maximum characters of result content shown in console and HTML views.
    /// `None` disables truncation.
    pub max_content_length: Option<usize>,
    /// Prefix of generated artifact filenames.
    pub filename_prefix: String,
    /// Maximum length of the query slug in generated filenames.
    pub slug_max_len: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("./results"),
            fallback_dir: PathBuf::from(FALLBACK_DIR_NAME),
            enable_html: true,
            max_content_length: Some(150),
            filename_prefix: "tavily".into(),
            slug_max_len: 50,
        }
    }
}

impl ReportConfig {
    /// Create a config writing into `save_dir`, defaults elsewhere.
    pub fn with_save_dir(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
            ..Default::default()
        }
    }

    /// Validates this configuration.
    ///
    /// Checks:
    /// - `save_dir` must not be empty
    /// - `slug_max_len` must be greater than 0
    /// - `max_content_length`, when set, must be greater than 0
    /// - `filename_prefix` must not contain path separators
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.save_dir.as_os_str().is_empty() {
            return Err(ConfigError("save_dir must not be empty".into()));
        }
        if self.slug_max_len == 0 {
            return Err(ConfigError("slug_max_len must be greater than 0".into()));
        }
        if self.max_content_length == Some(0) {
            return Err(ConfigError(
                "max_content_length must be greater than 0".into(),
            ));
        }
        if self.filename_prefix.contains(['/', '\\']) {
            return Err(ConfigError(
                "filename_prefix must not contain path separators".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = ReportConfig::default();
        assert_eq!(config.save_dir, PathBuf::from("./results"));
        assert_eq!(config.fallback_dir, PathBuf::from("tavily_results"));
        assert!(config.enable_html);
        assert_eq!(config.max_content_length, Some(150));
        assert_eq!(config.filename_prefix, "tavily");
        assert_eq!(config.slug_max_len, 50);
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(ReportConfig::default().validate().is_ok());
    }

    #[test]
    fn with_save_dir_overrides_only_directory() {
        let config = ReportConfig::with_save_dir("/tmp/reports");
        assert_eq!(config.save_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.filename_prefix, "tavily");
    }

    #[test]
    fn empty_save_dir_rejected() {
        let config = ReportConfig::with_save_dir("");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("save_dir"));
    }

    #[test]
    fn zero_slug_length_rejected() {
        let config = ReportConfig {
            slug_max_len: 0,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("slug"));
    }

    #[test]
    fn zero_content_length_rejected_but_none_allowed() {
        let zero = ReportConfig {
            max_content_length: Some(0),
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let unlimited = ReportConfig {
            max_content_length: None,
            ..Default::default()
        };
        assert!(unlimited.validate().is_ok());
    }

    #[test]
    fn prefix_with_separator_rejected() {
        let config = ReportConfig {
            filename_prefix: "../tavily".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
