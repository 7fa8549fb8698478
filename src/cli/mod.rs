//! CLI command definitions and argument parsing.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use diffpin::constants::ENV_LOG;
use diffpin::env::Env;
use tracing_subscriber::EnvFilter;

/// Default log directive when neither `-v` nor `DIFFPIN_LOG` is given.
const DEFAULT_LOG: &str = "warn";

/// Pick the log directive: `-v` wins, then the `DIFFPIN_LOG` value, then `warn`.
pub fn log_directive(verbose: bool, from_env: Option<String>) -> String {
    if verbose {
        return "debug".to_string();
    }
    from_env.unwrap_or_else(|| DEFAULT_LOG.to_string())
}

/// Install the global tracing subscriber, writing to stderr.
///
/// An unparsable `DIFFPIN_LOG` falls back to the default level.
pub fn init_logging(verbose: bool, env: &Env) {
    let directive = log_directive(verbose, env.non_empty(ENV_LOG));
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
