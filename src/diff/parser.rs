//! Unified diff format parser.
//!
//! Parses the output of `git diff` (or plain `diff -u`) into `DiffFile`s.
//! A malformed file section is reported and skipped; sibling files in the
//! same diff still parse.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::DEV_NULL;
use crate::models::diff::{ChangeLine, DiffFile, Hunk};

use super::DiffError;

static HUNK_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@(.*)$").unwrap()
});

/// The outcome of parsing a whole diff.
#[derive(Debug, Default)]
pub struct ParsedDiff {
    /// Files that parsed cleanly and have at least one hunk, in diff order.
    pub files: Vec<DiffFile>,
    /// One error per file section that could not be parsed.
    pub errors: Vec<DiffError>,
}

impl ParsedDiff {
    /// Fail on the first per-file error, for callers that want all-or-nothing.
    pub fn into_result(self) -> Result<Vec<DiffFile>, DiffError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.files),
        }
    }
}

/// Parse a unified diff string into per-file diffs.
pub fn parse_unified_diff(input: &str) -> ParsedDiff {
    let lines: Vec<&str> = input.lines().collect();
    let mut parsed = ParsedDiff::default();
    let mut i = 0;

    while i < lines.len() {
        // Anything before the first file header (commit message, mail
        // headers from format-patch) is not part of the diff.
        if !starts_file(&lines, i) {
            i += 1;
            continue;
        }

        match parse_file(&lines, &mut i) {
            Ok(Some(file)) => parsed.files.push(file),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed file section");
                parsed.errors.push(err);
                skip_to_next_file(&lines, &mut i);
            }
        }
    }

    parsed
}

/// Numbers parsed from a `@@ -a,b +c,d @@ section` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HunkHeader {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    pub section: Option<String>,
}

/// Parse a hunk header line. Omitted counts default to 1.
pub(crate) fn parse_hunk_header(line: &str) -> Option<HunkHeader> {
    let caps = HUNK_HEADER_RE.captures(line)?;
    let num = |idx: usize| -> Option<u32> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(1),
        }
    };
    let section = caps
        .get(5)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Some(HunkHeader {
        old_start: num(1)?,
        old_count: num(2)?,
        new_start: num(3)?,
        new_count: num(4)?,
        section,
    })
}

/// Whether a file section starts at `lines[i]`.
fn starts_file(lines: &[&str], i: usize) -> bool {
    let line = lines[i];
    line.starts_with("diff --git ")
        || (line.starts_with("--- ")
            && lines.get(i + 1).is_some_and(|next| next.starts_with("+++ ")))
}

fn skip_to_next_file(lines: &[&str], i: &mut usize) {
    *i += 1;
    while *i < lines.len() && !starts_file(lines, *i) {
        *i += 1;
    }
}

fn is_change_line(line: &str) -> bool {
    line.starts_with('+') || line.starts_with('-') || line.starts_with(' ')
}

/// Parse one file section starting at `lines[*i]`.
///
/// On success `*i` points at the next file header (or the end). On error
/// it points at the offending line.
fn parse_file(lines: &[&str], i: &mut usize) -> Result<Option<DiffFile>, DiffError> {
    let mut file = FileBuilder::default();

    if let Some(rest) = lines[*i].strip_prefix("diff --git ") {
        let (old_path, new_path) = parse_diff_header(rest);
        file.old_path = Some(old_path);
        file.new_path = Some(new_path);
        *i += 1;
    }

    while *i < lines.len() {
        let line = lines[*i];

        if line.starts_with("diff --git ") {
            break;
        }
        if file.saw_new_header && !file.hunk_in_progress() && starts_file(lines, *i) {
            break;
        }

        file.consume(line)?;
        *i += 1;
    }

    Ok(file.finish())
}

/// Line counters for one hunk, replaced by value at every step.
#[derive(Debug, Clone, Copy)]
struct LineCursor {
    old: u32,
    new: u32,
}

impl LineCursor {
    /// Classify `line` and return it together with the advanced cursor.
    ///
    /// Returns `None` when a counter would overflow `u32`.
    fn take(self, line: &str) -> Option<(ChangeLine, LineCursor)> {
        if let Some(content) = line.strip_prefix('+') {
            let change = ChangeLine::Added {
                content: content.to_string(),
                new_line: self.new,
            };
            Some((change, LineCursor { new: self.new.checked_add(1)?, ..self }))
        } else if let Some(content) = line.strip_prefix('-') {
            let change = ChangeLine::Removed {
                content: content.to_string(),
                old_line: self.old,
            };
            Some((change, LineCursor { old: self.old.checked_add(1)?, ..self }))
        } else {
            let content = line.strip_prefix(' ').unwrap_or(line);
            let change = ChangeLine::Context {
                content: content.to_string(),
                old_line: self.old,
                new_line: self.new,
            };
            let cursor = LineCursor {
                old: self.old.checked_add(1)?,
                new: self.new.checked_add(1)?,
            };
            Some((change, cursor))
        }
    }
}

/// A hunk under construction, tracking how many lines its header still owes.
#[derive(Debug)]
struct HunkBuilder {
    hunk: Hunk,
    cursor: LineCursor,
    old_left: u32,
    new_left: u32,
}

impl HunkBuilder {
    fn new(line: &str, header: HunkHeader) -> Self {
        Self {
            cursor: LineCursor {
                old: header.old_start,
                new: header.new_start,
            },
            old_left: header.old_count,
            new_left: header.new_count,
            hunk: Hunk {
                header: line.to_string(),
                old_start: header.old_start,
                old_count: header.old_count,
                new_start: header.new_start,
                new_count: header.new_count,
                section: header.section,
                changes: Vec::new(),
            },
        }
    }

    /// Append a change line. Returns false when the line numbers would
    /// overflow.
    fn push(&mut self, line: &str) -> bool {
        let Some((change, cursor)) = self.cursor.take(line) else {
            return false;
        };
        match change {
            ChangeLine::Added { .. } => self.new_left = self.new_left.saturating_sub(1),
            ChangeLine::Removed { .. } => self.old_left = self.old_left.saturating_sub(1),
            ChangeLine::Context { .. } => {
                self.old_left = self.old_left.saturating_sub(1);
                self.new_left = self.new_left.saturating_sub(1);
            }
        }
        self.cursor = cursor;
        self.hunk.changes.push(change);
        true
    }

    /// Whether every line promised by the header has been seen.
    fn is_exhausted(&self) -> bool {
        self.old_left == 0 && self.new_left == 0
    }
}

#[derive(Debug, Default)]
struct FileBuilder {
    old_path: Option<String>,
    new_path: Option<String>,
    saw_new_header: bool,
    is_new: bool,
    is_deleted: bool,
    is_rename: bool,
    hunks: Vec<Hunk>,
    current: Option<HunkBuilder>,
    patch: Vec<String>,
}

impl FileBuilder {
    /// Best-known name of this file, for error messages.
    fn display_path(&self) -> &str {
        self.new_path
            .as_deref()
            .filter(|p| *p != DEV_NULL)
            .or(self.old_path.as_deref())
            .unwrap_or("<unknown>")
    }

    fn hunk_in_progress(&self) -> bool {
        self.current.as_ref().is_some_and(|h| !h.is_exhausted())
    }

    fn consume(&mut self, line: &str) -> Result<(), DiffError> {
        if line.starts_with("@@") {
            let header = parse_hunk_header(line)
                .ok_or_else(|| DiffError::malformed(self.display_path(), line))?;
            self.finish_hunk();
            self.current = Some(HunkBuilder::new(line, header));
            self.patch.push(line.to_string());
            return Ok(());
        }

        if let Some(hunk) = self.current.as_mut() {
            if line.starts_with('\\') {
                // "\ No newline at end of file"
                self.patch.push(line.to_string());
            } else if hunk.is_exhausted() {
                // The header's counts are used up, so this is trailer text
                // such as the "-- " signature of git format-patch.
                tracing::debug!(file = self.display_path(), line, "ignoring line after hunk");
                self.finish_hunk();
            } else if !hunk.push(line) {
                return Err(DiffError::malformed(self.display_path(), line));
            } else {
                self.patch.push(line.to_string());
            }
            return Ok(());
        }

        if self.hunks.is_empty() {
            if self.extended_header(line) {
                return Ok(());
            }
            if is_change_line(line) {
                return Err(DiffError::malformed(self.display_path(), line));
            }
        }

        tracing::debug!(file = self.display_path(), line, "ignoring unrecognised diff line");
        Ok(())
    }

    /// Handle a git extended header or `---`/`+++` line. Returns false if
    /// `line` is not one.
    fn extended_header(&mut self, line: &str) -> bool {
        if let Some(rest) = line.strip_prefix("--- ") {
            self.old_path = Some(clean_header_path(rest));
        } else if let Some(rest) = line.strip_prefix("+++ ") {
            self.new_path = Some(clean_header_path(rest));
            self.saw_new_header = true;
        } else if line.starts_with("new file mode") {
            self.is_new = true;
        } else if line.starts_with("deleted file mode") {
            self.is_deleted = true;
        } else if let Some(path) = line.strip_prefix("rename from ") {
            self.is_rename = true;
            self.old_path = Some(path.to_string());
        } else if let Some(path) = line.strip_prefix("rename to ") {
            self.is_rename = true;
            if !self.saw_new_header {
                self.new_path = Some(path.to_string());
            }
        } else {
            return [
                "index ",
                "similarity index",
                "dissimilarity index",
                "old mode",
                "new mode",
                "copy from",
                "copy to",
                "Binary files",
                "GIT binary patch",
            ]
            .iter()
            .any(|prefix| line.starts_with(prefix));
        }
        true
    }

    fn finish_hunk(&mut self) {
        if let Some(builder) = self.current.take() {
            self.hunks.push(builder.hunk);
        }
    }

    fn finish(mut self) -> Option<DiffFile> {
        self.finish_hunk();

        if self.hunks.is_empty() {
            tracing::debug!(file = self.display_path(), "file has no hunks, skipping");
            return None;
        }

        let old_path = self.old_path.unwrap_or_else(|| DEV_NULL.to_string());
        let mut path = self.new_path.unwrap_or_else(|| old_path.clone());
        if self.is_deleted && !self.saw_new_header {
            path = DEV_NULL.to_string();
        }

        Some(DiffFile {
            is_new: self.is_new || old_path == DEV_NULL,
            is_deleted: self.is_deleted || path == DEV_NULL,
            is_rename: self.is_rename,
            path,
            old_path,
            hunks: self.hunks,
            patch: self.patch.join("\n"),
        })
    }
}

/// Clean a `---`/`+++` header path: drop a trailing timestamp and the
/// `a/`/`b/` prefix. `/dev/null` is returned untouched.
fn clean_header_path(raw: &str) -> String {
    let path = raw.split('\t').next().unwrap_or(raw).trim_end();
    if path == DEV_NULL {
        return path.to_string();
    }
    strip_diff_prefix(path).to_string()
}

/// Parse the rest of a "diff --git a/path b/path" header line.
fn parse_diff_header(rest: &str) -> (String, String) {
    // Handle paths with spaces by finding the second prefix separator
    // Paths are prefixed with a/ and b/ (default), or c/w/i/o/ when
    // git's diff.mnemonicPrefix is enabled.
    if let Some(b_idx) = find_second_prefix(rest) {
        let a_part = &rest[..b_idx];
        let b_part = &rest[b_idx + 1..];
        (
            strip_diff_prefix(a_part).to_string(),
            strip_diff_prefix(b_part).to_string(),
        )
    } else {
        let mut parts = rest.splitn(2, ' ');
        let old_path = strip_diff_prefix(parts.next().unwrap_or("")).to_string();
        let new_path = strip_diff_prefix(parts.next().unwrap_or("")).to_string();
        (old_path, new_path)
    }
}

/// Strip a single-character git diff prefix (`a/`, `b/`, `c/`, `w/`, `i/`, `o/`).
///
/// These prefixes appear in `diff --git` headers:
/// - `a/` and `b/` are the defaults.
/// - `c/` (commit), `w/` (working tree), `i/` (index), `o/` (object)
///   are used when `diff.mnemonicPrefix` is enabled.
fn strip_diff_prefix(path: &str) -> &str {
    let bytes = path.as_bytes();
    if bytes.len() >= 2
        && bytes[1] == b'/'
        && matches!(bytes[0], b'a' | b'b' | b'c' | b'w' | b'i' | b'o')
    {
        return &path[2..];
    }
    path
}

/// Find the position of the second path prefix separator in a diff header.
///
/// Looks for ` X/` where X is any known single-letter prefix.
fn find_second_prefix(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    (1..bytes.len().saturating_sub(1)).find(|&i| {
        bytes[i] == b' '
            && bytes.get(i + 2) == Some(&b'/')
            && matches!(bytes.get(i + 1), Some(b'a' | b'b' | b'c' | b'w' | b'i' | b'o'))
    })
}
