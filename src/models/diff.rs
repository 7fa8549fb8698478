//! Diff-related types: file diffs, hunks, change lines, and line ranges.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::constants::DEV_NULL;

/// The kind of a change line, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChangeKind {
    /// Line is unchanged (context).
    Context,
    /// Line exists only in the new version.
    Added,
    /// Line exists only in the old version.
    Removed,
}

/// A single line in a hunk, tagged by kind.
///
/// Context lines carry both line numbers, which advance in lockstep.
/// Added lines exist only in the new file, removed lines only in the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChangeLine {
    Context {
        content: String,
        old_line: u32,
        new_line: u32,
    },
    Added {
        content: String,
        new_line: u32,
    },
    Removed {
        content: String,
        old_line: u32,
    },
}

impl ChangeLine {
    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeLine::Context { .. } => ChangeKind::Context,
            ChangeLine::Added { .. } => ChangeKind::Added,
            ChangeLine::Removed { .. } => ChangeKind::Removed,
        }
    }

    /// The line content without its leading `+`/`-`/space marker.
    pub fn content(&self) -> &str {
        match self {
            ChangeLine::Context { content, .. }
            | ChangeLine::Added { content, .. }
            | ChangeLine::Removed { content, .. } => content,
        }
    }

    /// Line number in the old file (None for added lines).
    pub fn old_line(&self) -> Option<u32> {
        match self {
            ChangeLine::Context { old_line, .. } | ChangeLine::Removed { old_line, .. } => {
                Some(*old_line)
            }
            ChangeLine::Added { .. } => None,
        }
    }

    /// Line number in the new file (None for removed lines).
    pub fn new_line(&self) -> Option<u32> {
        match self {
            ChangeLine::Context { new_line, .. } | ChangeLine::Added { new_line, .. } => {
                Some(*new_line)
            }
            ChangeLine::Removed { .. } => None,
        }
    }
}

/// A contiguous hunk within a file diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// The literal `@@ ... @@` header line, kept for display.
    pub header: String,
    /// Starting line in the old file.
    pub old_start: u32,
    /// Number of lines in the old file.
    pub old_count: u32,
    /// Starting line in the new file.
    pub new_start: u32,
    /// Number of lines in the new file.
    pub new_count: u32,
    /// Text after the closing `@@` (usually the enclosing function), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// The change lines in this hunk.
    pub changes: Vec<ChangeLine>,
}

impl Hunk {
    /// Number of lines of the given kind in this hunk.
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind() == kind).count()
    }
}

/// A diff for a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffFile {
    /// Destination path (`/dev/null` for deleted files).
    pub path: String,
    /// Source path (`/dev/null` for new files).
    pub old_path: String,
    pub is_new: bool,
    pub is_deleted: bool,
    pub is_rename: bool,
    /// The hunks in this diff.
    pub hunks: Vec<Hunk>,
    /// Verbatim patch text of this file, from the first hunk header on.
    ///
    /// This is the same text a hosting platform's "list files" API returns
    /// per changed file, and the input the position resolver walks.
    pub patch: String,
}

impl DiffFile {
    /// Whether the destination is `/dev/null`.
    pub fn is_dev_null(&self) -> bool {
        self.path == DEV_NULL
    }

    /// Returns the total number of added lines across all hunks.
    pub fn added_lines(&self) -> usize {
        self.hunks.iter().map(|h| h.count(ChangeKind::Added)).sum()
    }

    /// Returns the total number of removed lines across all hunks.
    pub fn removed_lines(&self) -> usize {
        self.hunks.iter().map(|h| h.count(ChangeKind::Removed)).sum()
    }
}

/// A contiguous block of added lines, in 1-based new-file line numbers.
///
/// `end` is exclusive, so `[2, 3)` covers line 2 only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModifiedRange {
    pub start: u32,
    pub end: u32,
}

impl ModifiedRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A slice of a full file kept in a context excerpt.
///
/// Indices are 0-based and `end` is exclusive, always within `[0, line_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWindow {
    pub start: usize,
    pub end: usize,
}
