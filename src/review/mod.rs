//! Annotation pipeline: parse, filter, then derive per-file review data.
//!
//! Files are independent once parsed, so ranges and context excerpts are
//! computed in parallel. Output order always follows the order of the
//! files in the diff.

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::config::Config;
use crate::context::ContextBuilder;
use crate::diff::DiffError;
use crate::diff::filter::PathFilter;
use crate::diff::parser::parse_unified_diff;
use crate::diff::ranges::extract_modified_ranges;
use crate::diff::render::render_file;
use crate::models::{Annotation, FileAnnotation};

/// Turns raw diff text into [`Annotation`]s.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    filter: PathFilter,
    context: ContextBuilder,
}

impl Annotator {
    pub fn new(filter: PathFilter, context: ContextBuilder) -> Self {
        Self { filter, context }
    }

    /// Build from configuration. Fails when an exclude pattern is invalid.
    pub fn from_config(config: &Config) -> Result<Self, DiffError> {
        Ok(Self::new(
            PathFilter::new(config.filter.exclude_patterns.iter().cloned())?,
            ContextBuilder::from_config(&config.context),
        ))
    }

    /// Parse and filter a diff and compute modified ranges, without
    /// context excerpts.
    ///
    /// Callers that load file contents lazily use the kept paths of the
    /// result to decide what to read, then call [`Self::attach_context`].
    pub fn scope(&self, diff_text: &str) -> Annotation {
        let parsed = parse_unified_diff(diff_text);
        let errors = parsed.errors.iter().map(ToString::to_string).collect();

        let (kept, excluded) = self.filter.partition(parsed.files);
        tracing::debug!(kept = kept.len(), excluded = excluded.len(), "filtered diff files");

        let files = kept
            .into_par_iter()
            .map(|diff| {
                let ranges = extract_modified_ranges(&diff);
                let rendered = render_file(&diff);
                FileAnnotation {
                    diff,
                    ranges,
                    rendered,
                    context: None,
                }
            })
            .collect();

        Annotation {
            files,
            excluded: excluded.into_iter().map(|f| f.path).collect(),
            errors,
        }
    }

    /// Fill in the context excerpt of every file whose content is known.
    ///
    /// `contents` maps destination paths to full new-file text. Files
    /// without an entry keep `context: None`.
    pub fn attach_context(&self, annotation: &mut Annotation, contents: &IndexMap<String, String>) {
        annotation.files.par_iter_mut().for_each(|file| {
            if let Some(text) = contents.get(file.path()) {
                file.context = Some(self.context.build(text, &file.ranges));
            }
        });
    }

    /// Run the whole pipeline.
    pub fn annotate(&self, diff_text: &str, contents: &IndexMap<String, String>) -> Annotation {
        let mut annotation = self.scope(diff_text);
        self.attach_context(&mut annotation, contents);
        annotation
    }
}

/// Annotate a diff with the given configuration.
pub fn annotate(
    diff_text: &str,
    contents: &IndexMap<String, String>,
    config: &Config,
) -> Result<Annotation, DiffError> {
    Ok(Annotator::from_config(config)?.annotate(diff_text, contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SKIP_MARKER;
    use crate::models::ModifiedRange;
    use pretty_assertions::assert_eq;

    const DIFF: &str = "\
diff --git a/README.md b/README.md
--- a/README.md
+++ b/README.md
@@ -1 +1 @@
-old
+new
diff --git a/src/lib.rs b/src/lib.rs
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,3 +1,4 @@
 fn a() {}
+fn b() {}
 fn c() {}
 fn d() {}
diff --git a/gone.rs b/gone.rs
deleted file mode 100644
--- a/gone.rs
+++ /dev/null
@@ -1 +0,0 @@
-fn gone() {}
diff --git a/src/main.rs b/src/main.rs
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,1 +1,2 @@
 fn main() {}
+// tail
";

    fn config(patterns: &[&str], margin: usize) -> Config {
        let mut config = Config::default();
        config.filter.exclude_patterns = patterns.iter().map(|p| p.to_string()).collect();
        config.context.margin = margin;
        config
    }

    #[test]
    fn pipeline_filters_and_keeps_diff_order() {
        let annotation = annotate(DIFF, &IndexMap::new(), &config(&["**/*.md"], 1)).unwrap();

        let paths: Vec<&str> = annotation.files.iter().map(|f| f.path()).collect();
        assert_eq!(paths, vec!["src/lib.rs", "src/main.rs"]);
        assert_eq!(annotation.excluded, vec!["README.md", "/dev/null"]);
        assert!(annotation.errors.is_empty());
        assert_eq!(annotation.files[0].ranges, vec![ModifiedRange::new(2, 3)]);
        assert!(annotation.files[0].rendered.contains("+2 fn b() {}"));
        assert!(annotation.files[0].context.is_none());
    }

    #[test]
    fn context_is_attached_when_contents_are_known() {
        let mut contents = IndexMap::new();
        contents.insert(
            "src/lib.rs".to_string(),
            "fn a() {}\nfn b() {}\nfn c() {}\nfn d() {}".to_string(),
        );

        let annotation = annotate(DIFF, &contents, &config(&[], 1)).unwrap();
        let lib = &annotation.files[1];
        assert_eq!(lib.path(), "src/lib.rs");
        assert_eq!(
            lib.context.as_deref(),
            Some(format!("fn a() {{}}\nfn b() {{}}\nfn c() {{}}\n{SKIP_MARKER}").as_str())
        );
        assert!(annotation.files[2].context.is_none());
    }

    #[test]
    fn parse_failures_are_reported_alongside_good_files() {
        let diff = "diff --git a/bad.rs b/bad.rs\n--- a/bad.rs\n+++ b/bad.rs\n@@ nonsense @@\n+x\n\
diff --git a/ok.rs b/ok.rs\n--- a/ok.rs\n+++ b/ok.rs\n@@ -0,0 +1 @@\n+y\n";
        let annotation = Annotator::default().annotate(diff, &IndexMap::new());

        assert_eq!(annotation.files.len(), 1);
        assert_eq!(annotation.files[0].path(), "ok.rs");
        assert_eq!(annotation.errors.len(), 1);
        assert!(annotation.errors[0].contains("bad.rs"));
    }

    #[test]
    fn invalid_pattern_fails_construction() {
        let err = annotate(DIFF, &IndexMap::new(), &config(&["[oops"], 1)).unwrap_err();
        assert!(matches!(err, DiffError::InvalidGlobPattern { .. }));
    }
}
