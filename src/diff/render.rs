//! Line-number-annotated rendering of a file's hunks.
//!
//! Review prompts ask the model for comments keyed by line number, so each
//! change line is printed with the number(s) it has in the old and new
//! file: `+12 text` for additions, `-9 text` for removals, and ` 9,12 text`
//! for context.

use crate::models::diff::{ChangeLine, DiffFile, Hunk};

/// Render every hunk of a file, separated by their `@@` headers.
pub fn render_file(file: &DiffFile) -> String {
    file.hunks
        .iter()
        .map(render_hunk)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one hunk with its header and annotated change lines.
pub fn render_hunk(hunk: &Hunk) -> String {
    let mut lines = vec![hunk.header.clone()];
    lines.extend(hunk.changes.iter().map(render_change));
    lines.join("\n")
}

fn render_change(change: &ChangeLine) -> String {
    match change {
        ChangeLine::Added { content, new_line } => format!("+{new_line} {content}"),
        ChangeLine::Removed { content, old_line } => format!("-{old_line} {content}"),
        ChangeLine::Context {
            content,
            old_line,
            new_line,
        } => format!(" {old_line},{new_line} {content}"),
    }
}
