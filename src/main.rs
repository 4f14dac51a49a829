//! Website Words main entry point
//!
//! This is the command-line interface for the Website Words crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use website_words::config::{load_config_with_hash, validate, Config};
use website_words::crawler::{run_diagnostics_only, run_pipeline};
use website_words::output::print_summary;

/// Website Words: a polite batch word-frequency crawler
///
/// Website Words reads a list of sites, honors each site's robots.txt,
/// fetches every allowed page once, and writes word and page-structure
/// tables together with a diagnostic summary of the run.
#[derive(Parser, Debug)]
#[command(name = "website-words")]
#[command(version = "1.0.0")]
#[command(about = "A polite batch word-frequency crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Summarize the latest existing artifacts without crawling
    #[arg(long)]
    diagnostics_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_deref())?;

    let summary = if cli.diagnostics_only {
        tracing::info!(
            "Summarizing existing artifacts in {}",
            config.paths.output_dir.display()
        );
        run_diagnostics_only(&config).context("Diagnostics failed")?
    } else {
        tracing::info!("Reading sites from {}", config.paths.input.display());
        run_pipeline(&config).await.context("Run failed")?
    };

    if !cli.quiet {
        print_summary(&summary);
    }

    Ok(())
}

/// Loads and validates configuration, falling back to defaults
fn load(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        let config = Config::default();
        validate(&config).context("Default configuration is invalid")?;
        return Ok(config);
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("website_words=info,warn"),
            1 => EnvFilter::new("website_words=debug,info"),
            2 => EnvFilter::new("website_words=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
