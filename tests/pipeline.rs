//! End-to-end tests for the annotation pipeline.
//!
//! These tests drive the public API of the diffpin crate against a
//! realistic multi-file diff (format-patch preamble, new, deleted,
//! binary, and multi-hunk files).

use diffpin::anchor::anchor_comments;
use diffpin::config::Config;
use diffpin::constants::SKIP_MARKER;
use diffpin::context::ContextBuilder;
use diffpin::diff::DiffError;
use diffpin::diff::filter::PathFilter;
use diffpin::diff::parser::parse_unified_diff;
use diffpin::diff::ranges::extract_modified_ranges;
use diffpin::env::Env;
use diffpin::models::{
    AnchorMode, ChangeKind, CommentAnchor, MatchConvention, ModifiedRange, ReviewComment, Side,
};
use diffpin::position::{PositionIndex, PositionResolver, resolve_position};
use diffpin::review::Annotator;
use indexmap::IndexMap;
use pretty_assertions::assert_eq;

const REVIEW_DIFF: &str = include_str!("fixtures/diffs/review.diff");

fn paths<'a>(it: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    it.into_iter().collect()
}

// ---------------------------------------------------------------------------
// parse + filter
// ---------------------------------------------------------------------------

#[test]
fn parses_every_file_with_hunks_in_order() {
    let parsed = parse_unified_diff(REVIEW_DIFF);
    assert!(parsed.errors.is_empty());
    assert_eq!(
        paths(parsed.files.iter().map(|f| f.path.as_str())),
        vec![
            "src/test.ts",
            "docs/guide.md",
            "package.json",
            "src/server.ts",
            "/dev/null",
            "src/util.ts",
        ]
    );

    let server = &parsed.files[3];
    assert!(server.is_new);
    let legacy = &parsed.files[4];
    assert!(legacy.is_deleted);
    assert_eq!(legacy.old_path, "src/legacy.ts");
}

#[test]
fn exclude_patterns_and_deletions_are_filtered() {
    let files = parse_unified_diff(REVIEW_DIFF).files;
    let filter = PathFilter::from_comma_separated("**/*.md, **/*.json").unwrap();

    let (kept, excluded) = filter.partition(files);
    assert_eq!(
        paths(kept.iter().map(|f| f.path.as_str())),
        vec!["src/test.ts", "src/server.ts", "src/util.ts"]
    );
    assert_eq!(
        paths(excluded.iter().map(|f| f.path.as_str())),
        vec!["docs/guide.md", "package.json", "/dev/null"]
    );
}

#[test]
fn ranges_follow_each_hunk() {
    let files = parse_unified_diff(REVIEW_DIFF).files;
    let util = files.iter().find(|f| f.path == "src/util.ts").unwrap();

    assert_eq!(util.hunks.len(), 2);
    assert_eq!(util.hunks[0].section.as_deref(), Some("export function helper() {"));
    assert_eq!(
        extract_modified_ranges(util),
        vec![ModifiedRange::new(11, 13), ModifiedRange::new(42, 43)]
    );

    let server = files.iter().find(|f| f.path == "src/server.ts").unwrap();
    assert_eq!(extract_modified_ranges(server), vec![ModifiedRange::new(1, 4)]);
}

#[test]
fn format_patch_trailer_stays_out_of_the_last_file() {
    let files = parse_unified_diff(REVIEW_DIFF).files;
    let util = files.last().unwrap();

    assert_eq!(util.path, "src/util.ts");
    assert!(util.patch.ends_with("+  // unreachable\n }"));
    for hunk in &util.hunks {
        let context = hunk.count(ChangeKind::Context) as u32;
        assert_eq!(hunk.old_count, context + hunk.count(ChangeKind::Removed) as u32);
        assert_eq!(hunk.new_count, context + hunk.count(ChangeKind::Added) as u32);
    }
}

// ---------------------------------------------------------------------------
// positions
// ---------------------------------------------------------------------------

#[test]
fn scenario_line_resolves_to_position_two() {
    let diff = "diff --git a/src/test.ts b/src/test.ts\n--- a/src/test.ts\n+++ b/src/test.ts\n@@ -1,3 +1,4 @@\n console.log(\"test\");\n+console.log(\"new line\");\n console.log(\"end\");";
    let file = parse_unified_diff(diff).into_result().unwrap().remove(0);

    assert_eq!(file.path, "src/test.ts");
    assert_eq!(extract_modified_ranges(&file), vec![ModifiedRange::new(2, 3)]);
    assert_eq!(resolve_position(&file.path, &file.patch, 2).unwrap(), 2);
}

#[test]
fn positions_span_hunk_headers() {
    let files = parse_unified_diff(REVIEW_DIFF).files;
    let util = files.iter().find(|f| f.path == "src/util.ts").unwrap();

    let resolver = PositionResolver::default();
    assert_eq!(resolver.resolve(&util.path, &util.patch, 12, Side::Right).unwrap(), 4);
    assert_eq!(resolver.resolve(&util.path, &util.patch, 42, Side::Right).unwrap(), 9);
    assert_eq!(resolver.resolve(&util.path, &util.patch, 11, Side::Left).unwrap(), 2);

    let err = resolver.resolve(&util.path, &util.patch, 30, Side::Right).unwrap_err();
    assert!(matches!(err, DiffError::LineNotFound { line: 30, .. }));
}

#[test]
fn every_added_line_round_trips() {
    for file in parse_unified_diff(REVIEW_DIFF).files {
        let index = PositionIndex::build(&file.path, &file.patch).unwrap();
        for range in extract_modified_ranges(&file) {
            for line in range.start..range.end {
                let position = index
                    .position_of(line, Side::Right, MatchConvention::SideOnly)
                    .unwrap();
                assert_eq!(index.line_at(position).unwrap().new_line, Some(line));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// context
// ---------------------------------------------------------------------------

#[tokio::test]
async fn annotate_with_contents_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    let util: String = (1..=60).map(|i| format!("line {i}\n")).collect();
    std::fs::write(dir.path().join("src/util.ts"), util).unwrap();

    let mut config = Config::default();
    config.filter.exclude_patterns = vec!["**/*.md".into(), "**/*.json".into()];
    config.context.margin = 2;

    let annotator = Annotator::from_config(&config).unwrap();
    let mut annotation = annotator.scope(REVIEW_DIFF);
    let contents = diffpin::diff::file::load_file_contents(
        dir.path(),
        annotation.files.iter().map(|f| f.path()),
    )
    .await;
    annotator.attach_context(&mut annotation, &contents);

    assert_eq!(contents.len(), 1);
    let util = annotation.files.iter().find(|f| f.path() == "src/util.ts").unwrap();
    let context = util.context.as_deref().unwrap();

    let mut expected = vec![SKIP_MARKER.to_string()];
    expected.extend((9..=14).map(|i| format!("line {i}")));
    expected.push(SKIP_MARKER.to_string());
    expected.extend((40..=44).map(|i| format!("line {i}")));
    expected.push(SKIP_MARKER.to_string());
    assert_eq!(context.lines().collect::<Vec<_>>(), expected);

    // Files whose contents were not found keep no excerpt.
    let test_ts = annotation.files.iter().find(|f| f.path() == "src/test.ts").unwrap();
    assert!(test_ts.context.is_none());
}

#[test]
fn context_for_hundred_line_file() {
    let content: Vec<String> = (1..=100).map(|i| format!("line {i}")).collect();
    let result = ContextBuilder::new(10).build(&content.join("\n"), &[ModifiedRange::new(50, 51)]);
    let lines: Vec<&str> = result.lines().collect();

    assert_eq!(lines.first(), Some(&SKIP_MARKER));
    assert_eq!(lines.last(), Some(&SKIP_MARKER));
    assert_eq!(lines[1], "line 40");
    assert_eq!(lines[lines.len() - 2], "line 60");
    assert_eq!(lines.len(), 21 + 2);
}

#[test]
fn annotation_without_contents_has_ranges_only() {
    let annotation = Annotator::default().annotate(REVIEW_DIFF, &IndexMap::new());
    assert_eq!(annotation.excluded, vec!["/dev/null"]);
    assert!(annotation.files.iter().all(|f| f.context.is_none()));
    assert_eq!(annotation.files.len(), 5);
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn repo_config_drives_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".diffpin.toml"),
        "[filter]\nexclude_patterns = [\"src/**\"]\n",
    )
    .unwrap();

    let config = Config::load(Some(dir.path()), &Env::real()).unwrap();
    let annotation = Annotator::from_config(&config).unwrap().scope(REVIEW_DIFF);

    assert_eq!(
        paths(annotation.files.iter().map(|f| f.path())),
        vec!["docs/guide.md", "package.json"]
    );
}

// ---------------------------------------------------------------------------
// anchoring
// ---------------------------------------------------------------------------

#[test]
fn comments_from_json_are_anchored_or_dropped() {
    let comments: Vec<ReviewComment> = serde_json::from_str(
        r#"[
            {"path": "src/test.ts", "line": 2, "comment": "Use a logger."},
            {"path": "src/util.ts", "line": 42, "body": "Dead comment."},
            {"path": "src/util.ts", "line": 11, "body": "Magic number.", "side": "left"},
            {"path": "src/util.ts", "line": 99, "body": "Out of range."}
        ]"#,
    )
    .unwrap();

    let files = parse_unified_diff(REVIEW_DIFF).files;
    let report = anchor_comments(&files, comments, PositionResolver::default(), AnchorMode::Position);

    let anchors: Vec<_> = report.anchored.iter().map(|c| (c.path.as_str(), c.anchor)).collect();
    assert_eq!(
        anchors,
        vec![
            ("src/test.ts", CommentAnchor::Position { position: 2 }),
            ("src/util.ts", CommentAnchor::Position { position: 9 }),
            ("src/util.ts", CommentAnchor::Position { position: 2 }),
        ]
    );
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].comment.line, 99);
}

#[test]
fn malformed_section_does_not_hide_siblings() {
    let diff = format!(
        "diff --git a/broken.rs b/broken.rs\n--- a/broken.rs\n+++ b/broken.rs\n@@ -x +y @@\n+oops\n{REVIEW_DIFF}"
    );
    let parsed = parse_unified_diff(&diff);
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(parsed.files.len(), 6);
    assert!(parse_unified_diff(&diff).into_result().is_err());
}
