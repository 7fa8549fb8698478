//! Context windows around modified ranges.
//!
//! Keeps the lines near each change and replaces every run of skipped
//! lines with a single marker line, so a reviewer sees the changed code
//! with its surroundings without the whole file.

use crate::config::ContextConfig;
use crate::constants::{DEFAULT_CONTEXT_MARGIN, SKIP_MARKER};
use crate::models::diff::{ContextWindow, ModifiedRange};

/// Builds trimmed file excerpts around modified ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextBuilder {
    margin: usize,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_MARGIN)
    }
}

impl ContextBuilder {
    /// `margin` lines are kept on each side of every range.
    pub fn new(margin: usize) -> Self {
        Self { margin }
    }

    pub fn from_config(config: &ContextConfig) -> Self {
        Self::new(config.margin)
    }

    pub fn margin(&self) -> usize {
        self.margin
    }

    /// Compute the merged, clamped windows for a file of `line_count` lines.
    ///
    /// `ranges` hold 1-based line numbers; the windows returned are 0-based
    /// indices. Ranges may arrive in any order. A window whose start is at
    /// or before the previous window's end is merged into it, so touching
    /// windows become one.
    pub fn windows(&self, line_count: usize, ranges: &[ModifiedRange]) -> Vec<ContextWindow> {
        let mut sorted = ranges.to_vec();
        sorted.sort();

        let mut windows: Vec<ContextWindow> = Vec::new();
        for range in sorted.iter().filter(|r| !r.is_empty()) {
            let first = (range.start as usize).saturating_sub(1);
            let past_last = (range.end as usize).saturating_sub(1);

            let start = first.saturating_sub(self.margin);
            let end = past_last.saturating_add(self.margin).min(line_count);
            if start >= end {
                continue;
            }

            match windows.last_mut() {
                Some(prev) if start <= prev.end => prev.end = prev.end.max(end),
                _ => windows.push(ContextWindow { start, end }),
            }
        }

        windows
    }

    /// Render the excerpt of `full_text` around `ranges`.
    ///
    /// Lines inside windows are reproduced verbatim. A marker line stands
    /// in for each gap, including one before the first window and one after
    /// the last when they do not touch the file edges. A non-empty file
    /// with no ranges renders as a single marker.
    pub fn build(&self, full_text: &str, ranges: &[ModifiedRange]) -> String {
        let lines: Vec<&str> = full_text.lines().collect();
        if lines.is_empty() {
            return String::new();
        }

        let mut out: Vec<&str> = Vec::new();
        let mut cursor = 0;
        for window in self.windows(lines.len(), ranges) {
            if window.start > cursor {
                out.push(SKIP_MARKER);
            }
            out.extend_from_slice(&lines[window.start..window.end]);
            cursor = window.end;
        }
        if cursor < lines.len() {
            out.push(SKIP_MARKER);
        }

        out.join("\n")
    }
}
