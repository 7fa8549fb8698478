//! Output renderers: JSON, terminal, and GitHub pull-request review payloads.

pub mod github;
pub mod json;
pub mod terminal;

use crate::anchor::AnchorReport;
use crate::models::Annotation;

/// Trait for rendering engine results to an output format.
pub trait OutputRenderer {
    /// Render an annotated diff to a string.
    fn render_annotation(&self, annotation: &Annotation) -> String;

    /// Render the outcome of anchoring review comments.
    fn render_anchors(&self, report: &AnchorReport) -> String;
}
