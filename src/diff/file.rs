//! Read diffs and changed-file contents from disk.

use std::path::Path;

use indexmap::IndexMap;

use super::DiffError;

/// Read a unified diff from a file path.
pub async fn read_diff_file(path: &Path) -> Result<String, DiffError> {
    if !path.exists() {
        return Err(DiffError::PathNotFound(path.display().to_string()));
    }

    tokio::fs::read_to_string(path)
        .await
        .map_err(DiffError::FileReadError)
}

/// Load the current contents of changed files from a checkout.
///
/// Paths that are missing or not valid UTF-8 are skipped; the pipeline
/// simply produces no context excerpt for them.
pub async fn load_file_contents<'a>(
    root: &Path,
    paths: impl IntoIterator<Item = &'a str>,
) -> IndexMap<String, String> {
    let mut contents = IndexMap::new();

    for path in paths {
        let full = root.join(path);
        match tokio::fs::read_to_string(&full).await {
            Ok(content) => {
                contents.insert(path.to_string(), content);
            }
            Err(e) => {
                tracing::debug!(path, error = %e, "no readable content for changed file");
            }
        }
    }

    contents
}
