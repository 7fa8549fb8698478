//! Diff engine: unified diff parsing, path filtering, modified-range
//! extraction, and hunk rendering.

pub mod file;
pub mod filter;
pub mod parser;
pub mod ranges;
pub mod render;

use thiserror::Error;

use crate::models::InputMode;

/// Errors from the diff engine.
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("malformed diff in {file}: {line:?}")]
    MalformedDiff { file: String, line: String },

    #[error("line {line} of {file} does not appear in its patch")]
    LineNotFound { file: String, line: u32 },

    #[error("invalid glob pattern {pattern:?}: {source}")]
    InvalidGlobPattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("failed to read diff file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("path not found: {0}")]
    PathNotFound(String),
}

impl DiffError {
    pub(crate) fn malformed(file: &str, line: &str) -> Self {
        DiffError::MalformedDiff {
            file: file.to_string(),
            line: line.to_string(),
        }
    }
}

/// Read a unified diff from stdin.
pub async fn read_diff_stdin() -> Result<String, DiffError> {
    use tokio::io::AsyncReadExt;
    let mut buf = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buf)
        .await
        .map_err(DiffError::FileReadError)?;
    Ok(buf)
}

/// Load the raw diff text for the given input mode.
pub async fn read_diff(input: &InputMode) -> Result<String, DiffError> {
    match input {
        InputMode::DiffFile(path) => file::read_diff_file(path).await,
        InputMode::Stdin => read_diff_stdin().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_diff_from_diff_file() {
        let dir = tempfile::tempdir().unwrap();
        let diff_path = dir.path().join("test.diff");
        std::fs::write(
            &diff_path,
            "diff --git a/f.rs b/f.rs\nindex 111..222 100644\n--- a/f.rs\n+++ b/f.rs\n@@ -1,1 +1,1 @@\n-old\n+new\n",
        )
        .unwrap();

        let text = read_diff(&InputMode::DiffFile(diff_path)).await.unwrap();
        let parsed = parser::parse_unified_diff(&text);
        assert_eq!(parsed.files.len(), 1);
        assert_eq!(parsed.files[0].path, "f.rs");
    }

    #[tokio::test]
    async fn read_diff_file_not_found() {
        let input = InputMode::DiffFile(std::path::PathBuf::from("/tmp/diffpin_nonexistent.diff"));
        let result = read_diff(&input).await;
        assert!(matches!(result, Err(DiffError::PathNotFound(_))));
    }

    #[test]
    fn error_messages_name_file_and_line() {
        let err = DiffError::malformed("src/a.rs", "@@ nonsense @@");
        let msg = err.to_string();
        assert!(msg.contains("src/a.rs"));
        assert!(msg.contains("@@ nonsense @@"));

        let err = DiffError::LineNotFound {
            file: "src/b.rs".into(),
            line: 12,
        };
        assert_eq!(err.to_string(), "line 12 of src/b.rs does not appear in its patch");
    }
}
