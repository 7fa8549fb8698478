//! JSON output renderer.
//!
//! Annotations render as `{"files": [...], "excluded": [...], "errors": [...],
//! "summary": {...}}`; anchoring reports as `{"comments": [...], "dropped": [...]}`.

use serde::Serialize;

use crate::anchor::AnchorReport;
use crate::models::Annotation;
use crate::output::OutputRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

/// Totals across an annotated diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub files: usize,
    pub excluded: usize,
    pub errors: usize,
    pub added_lines: usize,
    pub removed_lines: usize,
}

impl Summary {
    pub fn from_annotation(annotation: &Annotation) -> Self {
        Self {
            files: annotation.files.len(),
            excluded: annotation.excluded.len(),
            errors: annotation.errors.len(),
            added_lines: annotation.files.iter().map(|f| f.diff.added_lines()).sum(),
            removed_lines: annotation.files.iter().map(|f| f.diff.removed_lines()).sum(),
        }
    }
}

impl OutputRenderer for JsonRenderer {
    fn render_annotation(&self, annotation: &Annotation) -> String {
        let output = serde_json::json!({
            "files": annotation.files,
            "excluded": annotation.excluded,
            "errors": annotation.errors,
            "summary": Summary::from_annotation(annotation),
        });

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn render_anchors(&self, report: &AnchorReport) -> String {
        let output = serde_json::json!({
            "comments": report.anchored,
            "dropped": report.dropped,
        });

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }
}
