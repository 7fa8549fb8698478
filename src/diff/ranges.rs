//! Modified-range extraction.
//!
//! Collapses runs of added lines into `[start, end)` blocks of new-file
//! line numbers. Each hunk is handled on its own, so ranges never merge
//! across a hunk boundary.

use crate::models::diff::{ChangeLine, DiffFile, Hunk, ModifiedRange};

/// Compute the blocks of added lines for every hunk of a file.
pub fn extract_modified_ranges(file: &DiffFile) -> Vec<ModifiedRange> {
    file.hunks.iter().flat_map(hunk_ranges).collect()
}

/// Compute the blocks of added lines in one hunk.
///
/// Removed lines neither open nor close a block; only context lines and
/// the end of the hunk close one.
pub fn hunk_ranges(hunk: &Hunk) -> Vec<ModifiedRange> {
    let mut ranges = Vec::new();
    let mut open: Option<ModifiedRange> = None;

    for change in &hunk.changes {
        match change {
            ChangeLine::Added { new_line, .. } => match open.as_mut() {
                Some(range) => range.end = new_line + 1,
                None => open = Some(ModifiedRange::new(*new_line, new_line + 1)),
            },
            ChangeLine::Context { .. } => ranges.extend(open.take()),
            ChangeLine::Removed { .. } => {}
        }
    }
    ranges.extend(open);

    ranges
}
