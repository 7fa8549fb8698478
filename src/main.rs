//! diffpin — diff annotation engine for automated code review.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use diffpin::anchor;
use diffpin::config;
use diffpin::constants;
use diffpin::context;
use diffpin::diff;
use diffpin::env;
use diffpin::models;
use diffpin::position;
use diffpin::review;

use std::path::Path;
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use indexmap::IndexMap;

use cli::args::{
    AnchorArgs, AnnotateArgs, Cli, Command, ContextArgs, DiffInputArgs, PositionArgs,
};
use config::Config;
use env::Env;
use models::{DiffFile, ModifiedRange, ReviewComment};
use review::Annotator;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let env = Env::real();

    cli::init_logging(cli.verbose, &env);

    let config = load_config(&cli, &env)?;

    match cli.command {
        Command::Parse(args) => run_parse(args).await,
        Command::Ranges(args) => run_ranges(args, &config).await,
        Command::Context(args) => run_context(args, &config, &cli.repo).await,
        Command::Position(args) => run_position(args, &config).await,
        Command::Annotate(args) => run_annotate(args, &config).await,
        Command::Anchor(args) => run_anchor(args, &config).await,
        Command::Version => run_version(),
    }
}

/// Load layered configuration, then apply CLI overrides on top.
fn load_config(cli: &Cli, env: &Env) -> Result<Config> {
    let mut config =
        Config::load(Some(&cli.repo), env).context("failed to load configuration")?;

    if let Some(ref patterns) = cli.exclude {
        config.filter.exclude_patterns = patterns
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(margin) = cli.margin {
        config.context.margin = margin;
    }

    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

/// Read the diff text from the selected input source.
async fn read_input(input: &DiffInputArgs) -> Result<String> {
    let mode = input.validate_input().map_err(|e| anyhow::anyhow!("{e}"))?;
    diff::read_diff(&mode).await.context("failed to read diff")
}

fn annotator(config: &Config) -> Result<Annotator> {
    Annotator::from_config(config).context("invalid exclude pattern")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Print version information.
fn run_version() -> Result<()> {
    use colored::Colorize;

    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    Ok(())
}

/// Parse a diff and print every file, unfiltered.
async fn run_parse(args: DiffInputArgs) -> Result<()> {
    let text = read_input(&args).await?;
    let parsed = diff::parser::parse_unified_diff(&text);

    let errors: Vec<String> = parsed.errors.iter().map(ToString::to_string).collect();
    print_json(&serde_json::json!({
        "files": parsed.files,
        "errors": errors,
    }))
}

/// Print the modified ranges of every file in scope, keyed by path.
async fn run_ranges(args: DiffInputArgs, config: &Config) -> Result<()> {
    let text = read_input(&args).await?;
    let annotation = annotator(config)?.scope(&text);

    let ranges: IndexMap<&str, &[ModifiedRange]> = annotation
        .files
        .iter()
        .map(|f| (f.path(), f.ranges.as_slice()))
        .collect();
    print_json(&ranges)
}

/// Print the context excerpt of a single file.
async fn run_context(args: ContextArgs, config: &Config, repo: &Path) -> Result<()> {
    let text = read_input(&args.input).await?;
    let annotation = annotator(config)?.scope(&text);

    let Some(file) = annotation.files.iter().find(|f| f.path() == args.file) else {
        bail!("{} is not among the changed files in scope", args.file);
    };

    let contents_path = args.contents.unwrap_or_else(|| repo.join(&args.file));
    let contents = tokio::fs::read_to_string(&contents_path)
        .await
        .with_context(|| format!("failed to read {}", contents_path.display()))?;

    let builder = context::ContextBuilder::from_config(&config.context);
    println!("{}", builder.build(&contents, &file.ranges));
    Ok(())
}

/// Resolve a line number to its diff position.
async fn run_position(args: PositionArgs, config: &Config) -> Result<()> {
    let patch = tokio::fs::read_to_string(&args.patch)
        .await
        .with_context(|| format!("failed to read {}", args.patch.display()))?;

    let path = args.path.unwrap_or_else(|| args.patch.display().to_string());
    let convention = args.convention.unwrap_or(config.position.convention);

    let position = position::PositionResolver::new(convention)
        .resolve(&path, &patch, args.line, args.side)
        .context("failed to resolve position")?;

    println!("{position}");
    Ok(())
}

/// Run the full annotation pipeline.
async fn run_annotate(args: AnnotateArgs, config: &Config) -> Result<()> {
    let text = read_input(&args.input).await?;
    let annotator = annotator(config)?;
    let mut annotation = annotator.scope(&text);

    if let Some(ref dir) = args.contents_dir {
        let contents =
            diff::file::load_file_contents(dir, annotation.files.iter().map(|f| f.path())).await;
        annotator.attach_context(&mut annotation, &contents);
    }

    if annotation.files.is_empty() {
        eprintln!("No changes in scope.");
    }

    let output = args
        .format
        .render_annotation(&annotation)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Anchor review comments onto the diff.
async fn run_anchor(args: AnchorArgs, config: &Config) -> Result<()> {
    let text = read_input(&args.input).await?;

    let raw = tokio::fs::read_to_string(&args.comments)
        .await
        .with_context(|| format!("failed to read {}", args.comments.display()))?;
    let comments: Vec<ReviewComment> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse comments in {}", args.comments.display()))?;

    // Comments on excluded files are dropped along with those files.
    let files: Vec<DiffFile> = annotator(config)?
        .scope(&text)
        .files
        .into_iter()
        .map(|f| f.diff)
        .collect();

    let resolver =
        position::PositionResolver::new(args.convention.unwrap_or(config.position.convention));
    let mode = args.mode.unwrap_or(config.position.anchor_mode);
    let report = anchor::anchor_comments(&files, comments, resolver, mode);

    let output = args.format.render_anchors(&report);
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
