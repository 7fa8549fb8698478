//! Context excerpts of changed files.
//!
//! Turns a full file plus its modified ranges into the trimmed text a
//! reviewer is shown alongside the diff.

pub mod window;

pub use window::ContextBuilder;
