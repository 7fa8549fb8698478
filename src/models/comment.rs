//! Review comment types: what a reviewer says, and where it lands.

use serde::{Deserialize, Serialize};

use super::Side;

/// A line comment as produced by the review layer, before anchoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    /// The file path relative to the repo root.
    pub path: String,
    /// The 1-based line number the comment is about.
    pub line: u32,
    /// The comment text.
    #[serde(alias = "comment")]
    pub body: String,
    /// Which side of the diff `line` refers to.
    #[serde(default)]
    pub side: Side,
}

/// The address a hosting platform uses to pin a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentAnchor {
    Position { position: u32 },
    Line { line: u32, side: Side },
}

/// A comment that has been pinned to a location inside a file's patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchoredComment {
    pub path: String,
    #[serde(flatten)]
    pub anchor: CommentAnchor,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_comment_accepts_comment_alias() {
        let raw = r#"{"path": "src/a.ts", "line": 3, "comment": "looks off"}"#;
        let c: ReviewComment = serde_json::from_str(raw).unwrap();
        assert_eq!(c.body, "looks off");
        assert_eq!(c.side, Side::Right);
    }

    #[test]
    fn anchored_comment_flattens_position() {
        let c = AnchoredComment {
            path: "src/a.ts".into(),
            anchor: CommentAnchor::Position { position: 4 },
            body: "hi".into(),
        };
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["position"], 4);
        assert!(json.get("line").is_none());
    }

    #[test]
    fn anchored_comment_flattens_line_and_side() {
        let c = AnchoredComment {
            path: "src/a.ts".into(),
            anchor: CommentAnchor::Line {
                line: 9,
                side: Side::Left,
            },
            body: "hi".into(),
        };
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["line"], 9);
        assert_eq!(json["side"], "left");
    }
}
