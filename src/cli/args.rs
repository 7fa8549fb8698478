//! Clap argument types and validation.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use diffpin::anchor::AnchorReport;
use diffpin::models::{AnchorMode, Annotation, MatchConvention, Side};
use diffpin::output::OutputRenderer;

/// Diff annotation engine for automated code review.
#[derive(Parser, Debug)]
#[command(name = "diffpin", version = diffpin::constants::VERSION)]
pub struct Cli {
    /// Log at debug level (overrides DIFFPIN_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Repository root used to find `.diffpin.toml` (default: current directory).
    #[arg(long, global = true, default_value = ".")]
    pub repo: PathBuf,

    /// Comma-separated glob patterns of files to leave out of the review.
    #[arg(long, global = true, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Lines of context kept on each side of a modified range.
    #[arg(long, global = true)]
    pub margin: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Parse a diff and print its files and hunks as JSON.
    Parse(DiffInputArgs),

    /// Print the blocks of added lines of every file in scope.
    Ranges(DiffInputArgs),

    /// Print the context excerpt of one file around its changes.
    Context(ContextArgs),

    /// Resolve a file line number to its position in a patch.
    Position(PositionArgs),

    /// Run the full pipeline: parse, filter, ranges, and context.
    Annotate(AnnotateArgs),

    /// Anchor review comments onto the diff.
    Anchor(AnchorArgs),

    /// Print version information.
    Version,
}

/// Where to read the unified diff from.
#[derive(clap::Args, Debug, Default)]
pub struct DiffInputArgs {
    /// Pre-computed unified diff file.
    #[arg(long)]
    pub diff_file: Option<PathBuf>,

    /// Read unified diff from stdin.
    #[arg(long, default_value_t = false)]
    pub diff_stdin: bool,
}

impl DiffInputArgs {
    /// Validate that exactly one input source is provided.
    pub fn validate_input(&self) -> Result<InputMode, String> {
        match (&self.diff_file, self.diff_stdin) {
            (Some(_), true) => {
                Err("only one input source allowed: --diff-file or --diff-stdin".to_string())
            }
            (Some(path), false) => Ok(InputMode::DiffFile(path.clone())),
            (None, true) => Ok(InputMode::Stdin),
            (None, false) => {
                Err("one input source is required: --diff-file or --diff-stdin".to_string())
            }
        }
    }
}

/// Arguments for the `context` subcommand.
#[derive(Parser, Debug)]
pub struct ContextArgs {
    #[command(flatten)]
    pub input: DiffInputArgs,

    /// Destination path of the file, as it appears in the diff.
    #[arg(long)]
    pub file: String,

    /// File holding the full new-file text (default: `--file` under `--repo`).
    #[arg(long)]
    pub contents: Option<PathBuf>,
}

/// Arguments for the `position` subcommand.
#[derive(Parser, Debug)]
pub struct PositionArgs {
    /// File holding one file's patch (hunk headers and change lines).
    #[arg(long)]
    pub patch: PathBuf,

    /// Line number to resolve.
    #[arg(long)]
    pub line: u32,

    /// Diff side the line number refers to.
    #[arg(long, value_enum, default_value_t = Side::Right)]
    pub side: Side,

    /// File name used in error messages (default: the patch file name).
    #[arg(long)]
    pub path: Option<String>,

    /// Line matching convention (overrides config).
    #[arg(long, value_enum)]
    pub convention: Option<MatchConvention>,
}

/// Arguments for the `annotate` subcommand.
#[derive(Parser, Debug)]
pub struct AnnotateArgs {
    #[command(flatten)]
    pub input: DiffInputArgs,

    /// Directory holding the new versions of the changed files. When set,
    /// every file in scope gets a context excerpt.
    #[arg(long)]
    pub contents_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Arguments for the `anchor` subcommand.
#[derive(Parser, Debug)]
pub struct AnchorArgs {
    #[command(flatten)]
    pub input: DiffInputArgs,

    /// JSON file with an array of `{path, line, body, side?}` comments.
    #[arg(long)]
    pub comments: PathBuf,

    /// How anchored comments address their line (overrides config).
    #[arg(long, value_enum)]
    pub mode: Option<AnchorMode>,

    /// Line matching convention (overrides config).
    #[arg(long, value_enum)]
    pub convention: Option<MatchConvention>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
    /// GitHub pull request review payload (`anchor` only).
    Github,
}

impl OutputFormat {
    /// Render an annotation using the renderer for this format.
    pub fn render_annotation(&self, annotation: &Annotation) -> Result<String, String> {
        match self {
            OutputFormat::Terminal => {
                Ok(diffpin::output::terminal::TerminalRenderer.render_annotation(annotation))
            }
            OutputFormat::Json => Ok(diffpin::output::json::JsonRenderer.render_annotation(annotation)),
            OutputFormat::Github => {
                Err("the github format only applies to the `anchor` command".to_string())
            }
        }
    }

    /// Render an anchoring report using the renderer for this format.
    pub fn render_anchors(&self, report: &AnchorReport) -> String {
        match self {
            OutputFormat::Terminal => diffpin::output::terminal::TerminalRenderer.render_anchors(report),
            OutputFormat::Json => diffpin::output::json::JsonRenderer.render_anchors(report),
            OutputFormat::Github => diffpin::output::github::GithubReviewRenderer.render(report),
        }
    }
}

// InputMode is defined in models/ and re-exported here for convenience.
pub use diffpin::models::InputMode;
