//! Annotation results handed to the review-orchestration layer.

use serde::{Deserialize, Serialize};

use super::diff::{DiffFile, ModifiedRange};

/// Structured, position-addressable change data for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnnotation {
    /// The parsed diff for this file.
    pub diff: DiffFile,
    /// Blocks of added lines, per hunk.
    pub ranges: Vec<ModifiedRange>,
    /// Hunks with every line prefixed by its line number(s), for prompts.
    pub rendered: String,
    /// Trimmed excerpt of the full file around `ranges`, when the file
    /// content was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl FileAnnotation {
    pub fn path(&self) -> &str {
        &self.diff.path
    }
}

/// The result of annotating a whole diff.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Annotation {
    /// Files kept after filtering, in diff order.
    pub files: Vec<FileAnnotation>,
    /// Destination paths removed by the path filter.
    pub excluded: Vec<String>,
    /// Per-file parse failures, rendered as messages.
    pub errors: Vec<String>,
}
