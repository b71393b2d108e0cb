//! Artifact persistence with safe filenames and atomic writes.
//!
//! Writes go temp file → fsync → rename inside the target directory, so a
//! failed write leaves no partial artifact behind. Requested filenames are
//! reduced to their final path segment before being joined to the save
//! directory.

use crate::config::ReportConfig;
use crate::error::WriteError;
use chrono::{DateTime, Local};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Characters replaced by `_` before slugging.
const UNSAFE_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Slug used when a query has no usable characters.
const EMPTY_SLUG: &str = "unnamed";

/// Query text used in generated names when the query is unknown.
const DEFAULT_QUERY_STEM: &str = "search";

/// Prefix of generated history export filenames.
const HISTORY_PREFIX: &str = "search_history";

/// Encoding of a rendered artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Normalized record as structured JSON.
    Json,
    /// HTML report.
    Html,
    /// Provider response exactly as received.
    RawJson,
}

impl ArtifactKind {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json | Self::RawJson => "json",
            Self::Html => "html",
        }
    }

    /// Short name used in logs and messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
            Self::RawJson => "raw json",
        }
    }

    /// Suffix appended to the generated stem, keeping raw and normalized
    /// JSON from the same second apart.
    fn stem_suffix(&self) -> &'static str {
        match self {
            Self::RawJson => "_raw",
            Self::Json | Self::Html => "",
        }
    }
}

/// Persists rendered artifacts into the configured save directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    save_dir: PathBuf,
    fallback_dir: PathBuf,
    filename_prefix: String,
    slug_max_len: usize,
}

impl ArtifactWriter {
    /// Create a writer from report configuration.
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            save_dir: config.save_dir.clone(),
            fallback_dir: config.fallback_dir.clone(),
            filename_prefix: config.filename_prefix.clone(),
            slug_max_len: config.slug_max_len,
        }
    }

    /// The configured save directory.
    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Write a record artifact.
    ///
    /// Uses the final path segment of `filename` when one is given, otherwise
    /// generates `{prefix}_{slug(query)}_{YYYYMMDD_HHMMSS}.{ext}` (with a
    /// `_raw` stem suffix for [`ArtifactKind::RawJson`]).
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] if no directory can be created or the file
    /// cannot be written. Nothing is left on disk in that case.
    pub fn write(
        &self,
        content: &str,
        filename: Option<&str>,
        query: Option<&str>,
        kind: ArtifactKind,
    ) -> Result<PathBuf, WriteError> {
        let name = resolve_file_name(filename, || {
            self.generated_name(query, kind, Local::now())
        });
        self.write_named(content, &name)
    }

    /// Write `content` under the final path segment of `file_name`.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::InvalidFileName`] when `file_name` has no usable
    /// final segment, or any error from [`write`](Self::write).
    pub fn write_named(&self, content: &str, file_name: &str) -> Result<PathBuf, WriteError> {
        let leaf =
            leaf_name(file_name).ok_or_else(|| WriteError::InvalidFileName(file_name.to_owned()))?;
        let dir = self.ensure_dir()?;
        let path = dir.join(leaf);
        write_atomic(&dir, &path, content.as_bytes())?;
        tracing::info!(path = %path.display(), bytes = content.len(), "artifact written");
        Ok(path)
    }

    /// Generated name for a record artifact.
    pub fn generated_name(
        &self,
        query: Option<&str>,
        kind: ArtifactKind,
        now: DateTime<Local>,
    ) -> String {
        let slug = slugify(query.unwrap_or(DEFAULT_QUERY_STEM), self.slug_max_len);
        format!(
            "{}_{slug}_{}{}.{}",
            self.filename_prefix,
            format_timestamp(now),
            kind.stem_suffix(),
            kind.extension()
        )
    }

    /// Create the save directory, falling back to the fixed fallback directory.
    fn ensure_dir(&self) -> Result<PathBuf, WriteError> {
        match std::fs::create_dir_all(&self.save_dir) {
            Ok(()) => Ok(self.save_dir.clone()),
            Err(err) => {
                tracing::warn!(
                    dir = %self.save_dir.display(),
                    fallback = %self.fallback_dir.display(),
                    error = %err,
                    "cannot create save directory, using fallback"
                );
                std::fs::create_dir_all(&self.fallback_dir).map_err(|source| {
                    WriteError::CreateDir {
                        path: self.fallback_dir.clone(),
                        source,
                    }
                })?;
                Ok(self.fallback_dir.clone())
            }
        }
    }
}

/// Generated name for a history export.
pub fn history_file_name(now: DateTime<Local>) -> String {
    format!("{HISTORY_PREFIX}_{}.json", format_timestamp(now))
}

/// Use the requested name when it has a usable leaf, otherwise `generate`.
pub fn resolve_file_name(requested: Option<&str>, generate: impl FnOnce() -> String) -> String {
    match requested.and_then(leaf_name) {
        Some(leaf) => leaf.to_owned(),
        None => generate(),
    }
}

/// Final path segment of `requested`, splitting on both `/` and `\`.
///
/// Returns `None` for empty, `.` and `..` leaves.
pub fn leaf_name(requested: &str) -> Option<&str> {
    let leaf = requested.rsplit(['/', '\\']).next()?.trim();
    match leaf {
        "" | "." | ".." => None,
        leaf => Some(leaf),
    }
}

/// Filesystem-safe slug of free text.
///
/// Unsafe characters become `_`, anything outside `[A-Za-z0-9_.\- ]` is
/// dropped (tabs and newlines included), space runs become a single `_`,
/// repeated underscores
/// collapse, and the result is lowercased and cut to `max_len` characters.
pub fn slugify(text: &str, max_len: usize) -> String {
    let replaced: String = text
        .chars()
        .map(|c| if UNSAFE_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ' '))
        .collect();

    let mut slug = String::with_capacity(replaced.len());
    for word in replaced.split(' ').filter(|w| !w.is_empty()) {
        if !slug.is_empty() {
            slug.push('_');
        }
        slug.push_str(word);
    }

    let mut collapsed = String::with_capacity(slug.len());
    for c in slug.chars() {
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c.to_ascii_lowercase());
    }

    let mut truncated: String = collapsed.chars().take(max_len).collect();
    if collapsed.chars().count() > max_len {
        truncated.truncate(truncated.trim_end_matches('_').len());
    }

    if truncated.is_empty() {
        EMPTY_SLUG.to_owned()
    } else {
        truncated
    }
}

/// `YYYYMMDD_HHMMSS` timestamp used in generated filenames.
pub fn format_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Write `bytes` to `path` atomically (temp file in `dir` → fsync → rename).
///
/// The temp file has a short random name, so any leaf that fits the
/// filesystem can be written. It is removed on drop if the rename fails.
fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), WriteError> {
    let result = (|| -> std::io::Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    })();

    result.map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}
