//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and fixed diff markers so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "diffpin";

/// Crate version, baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local config filename (e.g. `.diffpin.toml` in repo root).
pub const CONFIG_FILENAME: &str = ".diffpin.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "diffpin";

/// Path git uses for the missing side of an added or deleted file.
pub const DEV_NULL: &str = "/dev/null";

/// Line emitted for every run of lines left out of a context excerpt.
pub const SKIP_MARKER: &str = "// ... skipped unchanged code ...";

/// Default number of lines kept on each side of a modified range.
pub const DEFAULT_CONTEXT_MARGIN: usize = 10;

// ── Environment variable names ──────────────────────────────────────

pub const ENV_EXCLUDE_PATTERNS: &str = "DIFFPIN_EXCLUDE_PATTERNS";
pub const ENV_CONTEXT_MARGIN: &str = "DIFFPIN_CONTEXT_MARGIN";
pub const ENV_POSITION_CONVENTION: &str = "DIFFPIN_POSITION_CONVENTION";
pub const ENV_ANCHOR_MODE: &str = "DIFFPIN_ANCHOR_MODE";
pub const ENV_LOG: &str = "DIFFPIN_LOG";
