//! Command-line interface for the migrator
//!
//! Flag parsing (clap), logging setup and signal interception live here; the
//! actual work is delegated to [`crate::pipeline`].

use anyhow::Result;
use clap::{ArgAction, Parser};
use serde::Serialize;
use std::path::PathBuf;

mod migrate;
mod output;

pub use output::Output;

/// Rewrites deprecated identifiers in configuration trees, in place
#[derive(Parser, Debug)]
#[command(
    name = "config-migrator",
    version = env!("CARGO_PKG_VERSION"),
    about = "Rewrite deprecated identifiers in configuration trees, in place",
    long_about = "Walks every TARGET directory, selects files whose name matches one of the \
                  patterns and applies the ordered rule list to their content. \
                  Files are overwritten without backup."
)]
pub struct Cli {
    /// Root directories to migrate
    #[arg(value_name = "TARGET", required_unless_present = "list_rules")]
    pub targets: Vec<PathBuf>,

    /// File name patterns to migrate (comma-separated) [default: *.json,*.tmpl]
    #[arg(short, long, value_delimiter = ',')]
    pub patterns: Vec<String>,

    /// Concurrency level per stage [default: available parallelism]
    #[arg(short, long, allow_negative_numbers = true)]
    pub concurrency: Option<i64>,

    /// Path to a custom rule mapping (JSON array of [pattern, replacement])
    #[arg(short, long, value_name = "FILE")]
    pub mapping: Option<PathBuf>,

    /// Use custom settings file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cancel the remaining targets as soon as one fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Follow symbolic links while walking
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Print the active rules and exit
    #[arg(long)]
    pub list_rules: bool,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

/// CLI values that override lower configuration layers. Unset flags are
/// skipped so they never clobber a settings file or the environment.
#[derive(Debug, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_fast: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_symlinks: Option<bool>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);
        migrate::execute(self, &output).await
    }

    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            patterns: (!self.patterns.is_empty()).then(|| self.patterns.clone()),
            concurrency: self.concurrency.map(crate::parallel::clamp_concurrency),
            mapping: self.mapping.clone(),
            fail_fast: self.fail_fast.then_some(true),
            follow_symlinks: self.follow_symlinks.then_some(true),
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // try_init: a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
