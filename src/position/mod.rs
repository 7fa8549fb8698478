//! Diff position resolution.
//!
//! Review-comment APIs that anchor by "position" address a line by its
//! offset inside the file's patch text rather than by its line number.
//! The counter used here:
//!
//! - starts at 0 on the first hunk header, so the line right after it is
//!   position 1;
//! - advances once per patch line, later hunk headers and
//!   `\ No newline at end of file` markers included;
//! - ignores anything before the first hunk header (`---`/`+++` lines),
//!   so a full per-file diff section can be passed as well.
//!
//! Which counter a target line is compared against is fixed by
//! [`MatchConvention`].

use serde::Serialize;

use crate::config::PositionConfig;
use crate::diff::parser::parse_hunk_header;
use crate::diff::DiffError;
use crate::models::diff::ChangeKind;
use crate::models::{MatchConvention, Side};

/// One walked line of a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatchLine {
    /// Offset of this line in the patch.
    pub position: u32,
    /// `None` for hunk headers and no-newline markers.
    pub kind: Option<ChangeKind>,
    /// Old-file line number, when this line advanced the old counter.
    pub old_line: Option<u32>,
    /// New-file line number, when this line advanced the new counter.
    pub new_line: Option<u32>,
}

impl PatchLine {
    /// The line number this patch line has on `side`, if any.
    pub fn line_on(&self, side: Side) -> Option<u32> {
        match side {
            Side::Left => self.old_line,
            Side::Right => self.new_line,
        }
    }

    fn matches(&self, target: u32, side: Side, convention: MatchConvention) -> bool {
        match convention {
            MatchConvention::SideOnly => self.line_on(side) == Some(target),
            MatchConvention::FirstMatch => {
                self.old_line == Some(target) || self.new_line == Some(target)
            }
        }
    }
}

/// Walks a patch line by line, threading the position and line counters.
struct PatchWalker<'a> {
    path: &'a str,
    lines: std::str::Lines<'a>,
    position: Option<u32>,
    old: u32,
    new: u32,
    failed: bool,
}

impl<'a> PatchWalker<'a> {
    fn new(path: &'a str, patch: &'a str) -> Self {
        Self {
            path,
            lines: patch.lines(),
            position: None,
            old: 0,
            new: 0,
            failed: false,
        }
    }
}

impl Iterator for PatchWalker<'_> {
    type Item = Result<PatchLine, DiffError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let line = self.lines.next()?;
            let position = self.position.map_or(0, |p| p + 1);

            if line.starts_with("@@") {
                let Some(header) = parse_hunk_header(line) else {
                    self.failed = true;
                    return Some(Err(DiffError::malformed(self.path, line)));
                };
                self.old = header.old_start.saturating_sub(1);
                self.new = header.new_start.saturating_sub(1);
                self.position = Some(position);
                return Some(Ok(PatchLine {
                    position,
                    kind: None,
                    old_line: None,
                    new_line: None,
                }));
            }

            if self.position.is_none() {
                continue;
            }
            self.position = Some(position);

            let (kind, old, new) = if line.starts_with('\\') {
                (None, None, None)
            } else if line.starts_with('-') {
                (Some(ChangeKind::Removed), self.old.checked_add(1), Some(self.new))
            } else if line.starts_with('+') {
                (Some(ChangeKind::Added), Some(self.old), self.new.checked_add(1))
            } else {
                (Some(ChangeKind::Context), self.old.checked_add(1), self.new.checked_add(1))
            };

            let entry = match (kind, old, new) {
                (None, ..) => PatchLine {
                    position,
                    kind: None,
                    old_line: None,
                    new_line: None,
                },
                (Some(kind), Some(old), Some(new)) => {
                    self.old = old;
                    self.new = new;
                    PatchLine {
                        position,
                        kind: Some(kind),
                        old_line: (kind != ChangeKind::Added).then_some(old),
                        new_line: (kind != ChangeKind::Removed).then_some(new),
                    }
                }
                // A line counter ran past u32::MAX.
                _ => {
                    self.failed = true;
                    return Some(Err(DiffError::malformed(self.path, line)));
                }
            };
            return Some(Ok(entry));
        }
    }
}

/// Maps file line numbers to patch positions under a fixed convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionResolver {
    convention: MatchConvention,
}

impl PositionResolver {
    pub fn new(convention: MatchConvention) -> Self {
        Self { convention }
    }

    pub fn from_config(config: &PositionConfig) -> Self {
        Self::new(config.convention)
    }

    pub fn convention(&self) -> MatchConvention {
        self.convention
    }

    /// Return the position of `line` in `patch`.
    ///
    /// `path` only names the file in errors. Walking stops at the first
    /// matching line.
    pub fn resolve(&self, path: &str, patch: &str, line: u32, side: Side) -> Result<u32, DiffError> {
        for entry in PatchWalker::new(path, patch) {
            let entry = entry?;
            if entry.matches(line, side, self.convention) {
                return Ok(entry.position);
            }
        }

        Err(DiffError::LineNotFound {
            file: path.to_string(),
            line,
        })
    }
}

/// Resolve a new-file line with the default convention.
pub fn resolve_position(path: &str, patch: &str, line: u32) -> Result<u32, DiffError> {
    PositionResolver::default().resolve(path, patch, line, Side::Right)
}

/// Every line of a patch, walked once, for repeated lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionIndex {
    path: String,
    lines: Vec<PatchLine>,
}

impl PositionIndex {
    pub fn build(path: &str, patch: &str) -> Result<Self, DiffError> {
        let lines = PatchWalker::new(path, patch).collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            path: path.to_string(),
            lines,
        })
    }

    pub fn lines(&self) -> &[PatchLine] {
        &self.lines
    }

    /// Same lookup as [`PositionResolver::resolve`], without re-walking.
    pub fn position_of(
        &self,
        line: u32,
        side: Side,
        convention: MatchConvention,
    ) -> Result<u32, DiffError> {
        self.lines
            .iter()
            .find(|entry| entry.matches(line, side, convention))
            .map(|entry| entry.position)
            .ok_or_else(|| DiffError::LineNotFound {
                file: self.path.clone(),
                line,
            })
    }

    /// The patch line sitting at `position`.
    pub fn line_at(&self, position: u32) -> Option<&PatchLine> {
        self.lines
            .get(position as usize)
            .filter(|entry| entry.position == position)
    }
}
