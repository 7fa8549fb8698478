//! Terminal renderer: styled flowing text grouped by file.

use colored::Colorize;

use crate::anchor::AnchorReport;
use crate::models::{Annotation, CommentAnchor, FileAnnotation, ModifiedRange};
use crate::output::OutputRenderer;
use crate::output::json::Summary;

/// Terminal output renderer with colored, flowing text.
pub struct TerminalRenderer;

impl OutputRenderer for TerminalRenderer {
    fn render_annotation(&self, annotation: &Annotation) -> String {
        let mut output = String::new();

        if annotation.files.is_empty() {
            output.push_str(&format!("{}", "  ✔ No files in scope.\n".green()));
        }

        for file in &annotation.files {
            render_file(&mut output, file);
        }

        for path in &annotation.excluded {
            output.push_str(&format!(" {} {}\n", "–".dimmed(), format!("{path} (excluded)").dimmed()));
        }
        for error in &annotation.errors {
            output.push_str(&format!(" {} {}\n", "✖".red().bold(), error));
        }

        let summary = Summary::from_annotation(annotation);
        output.push_str(&format!("{}\n", "───────────────────────────────────".dimmed()));
        output.push_str(&format!(
            " {} {}, {} added, {} removed\n",
            summary.files.to_string().bold(),
            if summary.files == 1 { "file" } else { "files" },
            format!("+{}", summary.added_lines).green().bold(),
            format!("-{}", summary.removed_lines).red().bold(),
        ));

        output
    }

    fn render_anchors(&self, report: &AnchorReport) -> String {
        let mut output = String::new();

        for comment in &report.anchored {
            let location = match comment.anchor {
                CommentAnchor::Position { position } => {
                    format!("{} @ position {}", comment.path, position)
                }
                CommentAnchor::Line { line, side } => format!("{}:{} ({})", comment.path, line, side),
            };
            output.push_str(&format!(" {} {}\n", "●".cyan().bold(), location.bold()));
            output.push_str(&format!("   {}\n\n", comment.body));
        }

        for dropped in &report.dropped {
            output.push_str(&format!(
                " {} {}:{} {}\n",
                "⚠".yellow().bold(),
                dropped.comment.path,
                dropped.comment.line,
                "dropped".yellow().bold(),
            ));
            output.push_str(&format!("   {}\n\n", dropped.reason.dimmed()));
        }

        output.push_str(&format!("{}\n", "───────────────────────────────────".dimmed()));
        output.push_str(&format!(
            " {} anchored, {} dropped\n",
            report.anchored.len().to_string().bold(),
            report.dropped.len().to_string().yellow().bold(),
        ));

        output
    }
}

fn render_file(output: &mut String, file: &FileAnnotation) {
    let status = if file.diff.is_new {
        "new".green().to_string()
    } else if file.diff.is_rename {
        format!("renamed from {}", file.diff.old_path).blue().to_string()
    } else {
        "modified".normal().to_string()
    };

    output.push_str(&format!(
        " {} {} {} {}\n",
        file.path().bold(),
        format!("+{}", file.diff.added_lines()).green(),
        format!("-{}", file.diff.removed_lines()).red(),
        status,
    ));

    if !file.ranges.is_empty() {
        let ranges: Vec<String> = file.ranges.iter().map(format_range).collect();
        output.push_str(&format!("   {} {}\n", "→".cyan(), ranges.join(", ")));
    }

    if let Some(context) = &file.context {
        for line in context.lines() {
            output.push_str(&format!("   {}\n", line.dimmed()));
        }
    }

    output.push('\n');
}

/// `12` for a single line, `12-14` (inclusive) otherwise.
fn format_range(range: &ModifiedRange) -> String {
    if range.len() == 1 {
        range.start.to_string()
    } else {
        format!("{}-{}", range.start, range.end - 1)
    }
}
