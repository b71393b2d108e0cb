//! tavily-tools: command-line Tavily web search with structured reports.
//!
//! This crate wires the [`tavily_report`] pipeline to the outside world:
//! - **Configuration**: TOML file plus environment overrides
//! - **Logging**: `tracing` to stderr and an optional log file
//! - **Paths**: platform config directory via `dirs`
//!
//! The `tavily-tools` binary builds on these to run single and batch
//! searches, print console summaries and save JSON/HTML reports.

pub mod app_dirs;
pub mod config;
pub mod error;
pub mod logging;

pub use config::AppConfig;
pub use error::{AppError, Result};
