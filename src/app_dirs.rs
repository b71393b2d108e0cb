//! Application directory paths.
//!
//! Uses the [`dirs`] crate for platform-appropriate resolution.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Config | `~/Library/Application Support/tavily-tools/` | `~/.config/tavily-tools/` |
//!
//! Override with `TAVILY_TOOLS_CONFIG_DIR`.

use std::path::PathBuf;

const APP_DIR_NAME: &str = "tavily-tools";

/// Environment variable overriding [`config_dir`].
pub const CONFIG_DIR_ENV: &str = "TAVILY_TOOLS_CONFIG_DIR";

/// Application config directory.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join("tavily-tools-config"))
}

/// Path to `config.toml`.
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
