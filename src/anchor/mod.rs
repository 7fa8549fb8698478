//! Comment anchoring: pins `(path, line, body)` review comments onto the
//! locations a review API accepts.
//!
//! A comment whose file is not part of the diff, or whose line does not
//! appear in the file's patch, cannot be posted inline. Such comments are
//! dropped with a warning and reported back instead of failing the batch.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;

use crate::diff::DiffError;
use crate::models::{
    AnchorMode, AnchoredComment, CommentAnchor, DiffFile, MatchConvention, ReviewComment,
};
use crate::position::{PositionIndex, PositionResolver};

/// A comment that could not be anchored, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedComment {
    #[serde(flatten)]
    pub comment: ReviewComment,
    pub reason: String,
}

/// Outcome of anchoring a batch of comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnchorReport {
    /// Anchored comments, in input order, exact duplicates removed.
    pub anchored: Vec<AnchoredComment>,
    pub dropped: Vec<DroppedComment>,
}

/// Anchors comments against the files of one parsed diff.
pub struct CommentAnchorer<'a> {
    files: HashMap<&'a str, &'a DiffFile>,
    indexes: HashMap<&'a str, PositionIndex>,
    resolver: PositionResolver,
    mode: AnchorMode,
}

impl<'a> CommentAnchorer<'a> {
    pub fn new(files: &'a [DiffFile], resolver: PositionResolver, mode: AnchorMode) -> Self {
        Self {
            files: files.iter().map(|f| (f.path.as_str(), f)).collect(),
            indexes: HashMap::new(),
            resolver,
            mode,
        }
    }

    /// Anchor one comment, or explain why it cannot be.
    ///
    /// In line-side mode the comment keeps its line number, but the line
    /// must still appear in the patch on the requested side.
    pub fn anchor(&mut self, comment: &ReviewComment) -> Result<AnchoredComment, DiffError> {
        let file = *self
            .files
            .get(comment.path.as_str())
            .ok_or_else(|| DiffError::PathNotFound(comment.path.clone()))?;

        let index = match self.indexes.entry(file.path.as_str()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(PositionIndex::build(&file.path, &file.patch)?),
        };

        let anchor = match self.mode {
            AnchorMode::Position => CommentAnchor::Position {
                position: index.position_of(comment.line, comment.side, self.resolver.convention())?,
            },
            AnchorMode::LineSide => {
                // The emitted side must hold the line, whatever the convention.
                index.position_of(comment.line, comment.side, MatchConvention::SideOnly)?;
                CommentAnchor::Line {
                    line: comment.line,
                    side: comment.side,
                }
            }
        };

        Ok(AnchoredComment {
            path: comment.path.clone(),
            anchor,
            body: comment.body.clone(),
        })
    }

    /// Anchor a batch, dropping what cannot be placed.
    pub fn anchor_all(&mut self, comments: Vec<ReviewComment>) -> AnchorReport {
        let mut report = AnchorReport::default();

        for comment in comments {
            match self.anchor(&comment) {
                Ok(anchored) => {
                    if report.anchored.contains(&anchored) {
                        tracing::debug!(path = %anchored.path, "skipping duplicate comment");
                        continue;
                    }
                    report.anchored.push(anchored);
                }
                Err(err) => {
                    tracing::warn!(path = %comment.path, line = comment.line, "dropping comment: {err}");
                    report.dropped.push(DroppedComment {
                        comment,
                        reason: err.to_string(),
                    });
                }
            }
        }

        report
    }
}

/// Anchor `comments` against `files` in one call.
pub fn anchor_comments(
    files: &[DiffFile],
    comments: Vec<ReviewComment>,
    resolver: PositionResolver,
    mode: AnchorMode,
) -> AnchorReport {
    CommentAnchorer::new(files, resolver, mode).anchor_all(comments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::parser::parse_unified_diff;
    use crate::models::Side;

    const DIFF: &str = "\
diff --git a/src/test.ts b/src/test.ts
--- a/src/test.ts
+++ b/src/test.ts
@@ -1,3 +1,4 @@
 console.log(\"test\");
+console.log(\"new line\");
 console.log(\"end\");
diff --git a/src/other.ts b/src/other.ts
--- a/src/other.ts
+++ b/src/other.ts
@@ -5,2 +5,2 @@
-let a = 1;
+let a = 2;
 export { a };
";

    fn comment(path: &str, line: u32, body: &str) -> ReviewComment {
        ReviewComment {
            path: path.to_string(),
            line,
            body: body.to_string(),
            side: Side::Right,
        }
    }

    #[test]
    fn anchors_by_position() {
        let files = parse_unified_diff(DIFF).files;
        let report = anchor_comments(
            &files,
            vec![comment("src/test.ts", 2, "why log?"), comment("src/other.ts", 5, "magic number")],
            PositionResolver::default(),
            AnchorMode::Position,
        );

        assert!(report.dropped.is_empty());
        assert_eq!(report.anchored.len(), 2);
        assert_eq!(report.anchored[0].anchor, CommentAnchor::Position { position: 2 });
        assert_eq!(report.anchored[1].anchor, CommentAnchor::Position { position: 2 });
        assert_eq!(report.anchored[1].path, "src/other.ts");
    }

    #[test]
    fn line_side_mode_keeps_line_numbers() {
        let files = parse_unified_diff(DIFF).files;
        let mut left = comment("src/other.ts", 5, "old value");
        left.side = Side::Left;

        let report = anchor_comments(
            &files,
            vec![left],
            PositionResolver::default(),
            AnchorMode::LineSide,
        );

        assert_eq!(
            report.anchored[0].anchor,
            CommentAnchor::Line {
                line: 5,
                side: Side::Left
            }
        );
    }

    #[test]
    fn unknown_line_and_unknown_file_are_dropped() {
        let files = parse_unified_diff(DIFF).files;
        let report = anchor_comments(
            &files,
            vec![
                comment("src/test.ts", 40, "far away"),
                comment("README.md", 1, "not in diff"),
                comment("src/test.ts", 2, "kept"),
            ],
            PositionResolver::default(),
            AnchorMode::Position,
        );

        assert_eq!(report.anchored.len(), 1);
        assert_eq!(report.anchored[0].body, "kept");
        assert_eq!(report.dropped.len(), 2);
        assert!(report.dropped[0].reason.contains("line 40"));
        assert!(report.dropped[1].reason.contains("README.md"));
    }

    #[test]
    fn exact_duplicates_are_collapsed() {
        let files = parse_unified_diff(DIFF).files;
        let report = anchor_comments(
            &files,
            vec![comment("src/test.ts", 2, "same"), comment("src/test.ts", 2, "same")],
            PositionResolver::default(),
            AnchorMode::Position,
        );
        assert_eq!(report.anchored.len(), 1);
    }

    #[test]
    fn resolver_convention_is_honoured() {
        let diff = "diff --git a/f b/f\n--- a/f\n+++ b/f\n@@ -1,4 +1,4 @@\n-a\n-b\n-c\n+x\n+y\n+z\n d\n";
        let files = parse_unified_diff(diff).files;
        let comments = vec![comment("f", 3, "z?")];

        let side_only = anchor_comments(
            &files,
            comments.clone(),
            PositionResolver::new(MatchConvention::SideOnly),
            AnchorMode::Position,
        );
        let first_match = anchor_comments(
            &files,
            comments,
            PositionResolver::new(MatchConvention::FirstMatch),
            AnchorMode::Position,
        );

        assert_eq!(side_only.anchored[0].anchor, CommentAnchor::Position { position: 6 });
        assert_eq!(first_match.anchored[0].anchor, CommentAnchor::Position { position: 3 });
    }

    #[test]
    fn line_side_mode_ignores_matches_on_the_other_side() {
        let diff = "diff --git a/f b/f\n--- a/f\n+++ b/f\n@@ -1,3 +1,1 @@\n-a\n-b\n-c\n+x\n";
        let files = parse_unified_diff(diff).files;

        let report = anchor_comments(
            &files,
            vec![comment("f", 3, "only exists on the old side")],
            PositionResolver::new(MatchConvention::FirstMatch),
            AnchorMode::LineSide,
        );

        assert!(report.anchored.is_empty());
        assert_eq!(report.dropped.len(), 1);
        assert!(report.dropped[0].reason.contains("line 3"));
    }
}
