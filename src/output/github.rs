//! GitHub pull request review payload renderer.
//!
//! Builds the JSON body of `POST /repos/{owner}/{repo}/pulls/{n}/reviews`
//! from anchored comments. Nothing is sent; the payload is printed so it
//! can be inspected or piped into whatever posts it.

use serde::Serialize;

use crate::anchor::AnchorReport;
use crate::constants::APP_NAME;
use crate::models::{AnchoredComment, CommentAnchor, Side};

/// One inline comment of a review payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GithubReviewComment {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// `LEFT` or `RIGHT`, only alongside `line`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
    pub body: String,
}

impl From<&AnchoredComment> for GithubReviewComment {
    fn from(comment: &AnchoredComment) -> Self {
        let (position, line, side) = match comment.anchor {
            CommentAnchor::Position { position } => (Some(position), None, None),
            CommentAnchor::Line { line, side } => (None, Some(line), Some(github_side(side))),
        };
        Self {
            path: comment.path.clone(),
            position,
            line,
            side,
            body: comment.body.clone(),
        }
    }
}

/// A pull request review creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GithubReview {
    pub event: &'static str,
    pub body: String,
    pub comments: Vec<GithubReviewComment>,
}

/// GitHub review payload renderer.
pub struct GithubReviewRenderer;

impl GithubReviewRenderer {
    /// Build the review payload. Dropped comments are counted in the body.
    pub fn review(&self, report: &AnchorReport) -> GithubReview {
        let anchored = report.anchored.len();
        let mut body = format!(
            "**{APP_NAME}** placed {anchored} inline {}",
            if anchored == 1 { "comment" } else { "comments" },
        );
        if !report.dropped.is_empty() {
            body.push_str(&format!(
                " ({} could not be placed on the diff)",
                report.dropped.len()
            ));
        }

        GithubReview {
            event: "COMMENT",
            body,
            comments: report.anchored.iter().map(GithubReviewComment::from).collect(),
        }
    }

    pub fn render(&self, report: &AnchorReport) -> String {
        serde_json::to_string_pretty(&self.review(report)).unwrap_or_else(|_| "{}".to_string())
    }
}

fn github_side(side: Side) -> &'static str {
    match side {
        Side::Left => "LEFT",
        Side::Right => "RIGHT",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::DroppedComment;
    use crate::models::ReviewComment;

    fn report() -> AnchorReport {
        AnchorReport {
            anchored: vec![
                AnchoredComment {
                    path: "src/test.ts".into(),
                    anchor: CommentAnchor::Position { position: 2 },
                    body: "Why log here?".into(),
                },
                AnchoredComment {
                    path: "src/old.ts".into(),
                    anchor: CommentAnchor::Line {
                        line: 7,
                        side: Side::Left,
                    },
                    body: "This was load-bearing".into(),
                },
            ],
            dropped: vec![DroppedComment {
                comment: ReviewComment {
                    path: "src/x.ts".into(),
                    line: 1,
                    body: "x".into(),
                    side: Side::Right,
                },
                reason: "path not found: src/x.ts".into(),
            }],
        }
    }

    #[test]
    fn review_payload_shape() {
        let output = GithubReviewRenderer.render(&report());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["event"], "COMMENT");
        assert!(parsed["body"].as_str().unwrap().contains("2 inline comments"));
        assert!(parsed["body"].as_str().unwrap().contains("1 could not be placed"));

        let comments = parsed["comments"].as_array().unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0]["position"], 2);
        assert!(comments[0].get("line").is_none());
        assert_eq!(comments[1]["line"], 7);
        assert_eq!(comments[1]["side"], "LEFT");
        assert!(comments[1].get("position").is_none());
    }

    #[test]
    fn empty_report_has_no_comments() {
        let review = GithubReviewRenderer.review(&AnchorReport::default());
        assert!(review.comments.is_empty());
        assert!(review.body.contains("0 inline comments"));
    }
}
