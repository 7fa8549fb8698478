//! diffpin — diff annotation engine for automated code review (library crate).
//!
//! Parses unified diffs, decides which files are in scope, maps file line
//! numbers onto review-API diff positions, and builds trimmed context
//! excerpts around changed code. Re-exports public modules for integration
//! tests and external use.

pub mod anchor;
pub mod config;
pub mod constants;
pub mod context;
pub mod diff;
pub mod env;
pub mod models;
pub mod output;
pub mod position;
pub mod review;
