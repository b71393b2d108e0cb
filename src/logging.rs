//! Tracing subscriber setup.
//!
//! Events go to stderr; when a log file is configured they are also written
//! there, without ANSI colours, through a non-blocking writer. `RUST_LOG`
//! always wins over the configured level.

use crate::config::LoggingConfig;
use crate::error::{AppError, Result};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Keeps the file writer flushing until dropped. Hold it for the life of `main`.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Console verbosity requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

/// Filter directives for the configured level and verbosity.
///
/// Dependencies stay at `warn`; only this application's crates follow the
/// configured level.
pub fn filter_directives(level: &str, verbosity: Verbosity) -> String {
    let level = match verbosity {
        Verbosity::Quiet => LevelFilter::ERROR,
        Verbosity::Verbose => LevelFilter::DEBUG,
        Verbosity::Normal => level.trim().parse().unwrap_or(LevelFilter::INFO),
    };
    let level = level.to_string().to_ascii_lowercase();
    format!("warn,tavily_tools={level},tavily_report={level}")
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns [`AppError::Logging`] if a subscriber is already installed or the
/// log file directory cannot be created.
pub fn init(config: &LoggingConfig, verbosity: Verbosity) -> Result<LogGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&config.level, verbosity)));

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| AppError::Logging(format!("invalid log file {}", path.display())))?;
            std::fs::create_dir_all(dir).map_err(|e| {
                AppError::Logging(format!("cannot create log directory {}: {e}", dir.display()))
            })?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))?;

    Ok(LogGuard { _file: guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_applies_to_own_crates() {
        assert_eq!(
            filter_directives("debug", Verbosity::Normal),
            "warn,tavily_tools=debug,tavily_report=debug"
        );
        assert_eq!(
            filter_directives("WARN", Verbosity::Normal),
            "warn,tavily_tools=warn,tavily_report=warn"
        );
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(
            filter_directives("chatty", Verbosity::Normal),
            "warn,tavily_tools=info,tavily_report=info"
        );
    }

    #[test]
    fn verbosity_overrides_configured_level() {
        assert!(filter_directives("info", Verbosity::Verbose).contains("tavily_tools=debug"));
        assert!(filter_directives("debug", Verbosity::Quiet).contains("tavily_report=error"));
    }

    #[test]
    fn directives_parse() {
        for verbosity in [Verbosity::Quiet, Verbosity::Normal, Verbosity::Verbose] {
            let directives = filter_directives("info", verbosity);
            assert!(EnvFilter::try_new(&directives).is_ok(), "{directives}");
        }
    }
}
