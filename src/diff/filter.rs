//! Glob-based exclusion of changed files.
//!
//! Patterns are case-sensitive and follow standard glob semantics: `*`
//! and `?` stay within one path segment, `**` spans directories, and
//! `{a,b}` / `[ab]` classes are supported.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::constants::DEV_NULL;
use crate::models::diff::DiffFile;

use super::DiffError;

/// Excludes files whose destination path matches any configured pattern.
#[derive(Debug, Clone)]
pub struct PathFilter {
    patterns: Vec<String>,
    set: GlobSet,
}

impl PathFilter {
    /// Compile a filter from glob patterns.
    ///
    /// Fails on the first invalid pattern: a silently dropped exclusion
    /// could let files into the review that were meant to stay out.
    pub fn new<I, S>(patterns: I) -> Result<Self, DiffError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let mut builder = GlobSetBuilder::new();

        for pattern in &patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|source| DiffError::InvalidGlobPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            builder.add(glob);
        }

        let set = builder.build().map_err(|source| DiffError::InvalidGlobPattern {
            pattern: patterns.join(","),
            source,
        })?;

        Ok(Self { patterns, set })
    }

    /// Compile a filter from a comma-separated pattern list.
    ///
    /// Entries are trimmed and empty entries are dropped, so `""` yields a
    /// filter that excludes nothing but `/dev/null`.
    pub fn from_comma_separated(list: &str) -> Result<Self, DiffError> {
        Self::new(split_patterns(list))
    }

    /// The patterns this filter was built from.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether a destination path is out of scope.
    pub fn is_excluded(&self, path: &str) -> bool {
        path == DEV_NULL || self.set.is_match(path)
    }

    /// Keep only the files that are in scope, preserving order.
    pub fn filter(&self, files: Vec<DiffFile>) -> Vec<DiffFile> {
        self.partition(files).0
    }

    /// Split files into (kept, excluded), preserving order in both.
    pub fn partition(&self, files: Vec<DiffFile>) -> (Vec<DiffFile>, Vec<DiffFile>) {
        files.into_iter().partition(|file| {
            let excluded = self.is_excluded(&file.path);
            if excluded {
                tracing::debug!(path = %file.path, "excluding file");
            }
            !excluded
        })
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }
}

/// Split a comma-separated pattern list, trimming whitespace and dropping
/// empty entries.
pub fn split_patterns(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
