//! Shared types used across all modules.
//!
//! This module defines the core data structures for diffs, review
//! comments, and annotation results. Other modules import from here
//! rather than reaching into each other's internals.

pub mod annotation;
pub mod comment;
pub mod diff;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use annotation::{Annotation, FileAnnotation};
pub use comment::{AnchoredComment, CommentAnchor, ReviewComment};
pub use diff::{ChangeKind, ChangeLine, ContextWindow, DiffFile, Hunk, ModifiedRange};

/// Where the diff text comes from.
#[derive(Debug, Clone)]
pub enum InputMode {
    /// Read a pre-computed unified diff from a file.
    DiffFile(PathBuf),
    /// Read a unified diff from stdin.
    Stdin,
}

/// Which side of the diff a line number refers to.
///
/// Mirrors the `side` field of review-comment APIs: `left` is the old
/// file, `right` the new one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Side {
    Left,
    #[default]
    Right,
}

/// How a target line is matched while replaying a patch.
///
/// A line number can exist on both sides of a diff at different patch
/// offsets, so the resolver needs a fixed rule for which one wins.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum MatchConvention {
    /// Only the counter of the requested side is compared.
    #[default]
    SideOnly,
    /// The first line where either the old or the new counter matches wins.
    FirstMatch,
}

/// How anchored comments address their line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AnchorMode {
    /// `(path, position)`: patch-relative diff position.
    #[default]
    Position,
    /// `(path, line, side)`: file line number plus diff side.
    LineSide,
}
