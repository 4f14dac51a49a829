//! End-to-end run pipeline
//!
//! A run goes through a fixed sequence of stages:
//! 1. Prepare directories and truncate the run log
//! 2. Crawl every site (inside the run guard)
//! 3. Write and sort the word and site tables
//! 4. Transcode the run log into the log table
//! 5. Derive the diagnostic summary from the artifacts on disk
//!
//! A failure inside the guarded stages is logged and the run still reaches
//! diagnostics.

use crate::config::{Config, PathsConfig};
use crate::crawler::coordinator::RunCoordinator;
use crate::events::{Category, EventSink, FileEventSink};
use crate::output::{
    DiagnosticSummary, DiagnosticsAggregator, LogTranscoder, OutputWriter, RunStamp, RunTiming,
};
use crate::site::load_sites;
use crate::WordsError;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Creates the input, output, and log directories and empties the run log
pub fn prepare_workspace(paths: &PathsConfig) -> std::io::Result<()> {
    for dir in [paths.input.parent(), Some(paths.output_dir.as_path()), paths.log_file.parent()]
        .into_iter()
        .flatten()
    {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    File::create(&paths.log_file)?;
    Ok(())
}

/// Runs the whole pipeline
///
/// # Returns
///
/// * `Ok(DiagnosticSummary)` - The run finished (possibly with logged failures)
/// * `Err(WordsError)` - The workspace or run log could not be set up
pub async fn run_pipeline(config: &Config) -> Result<DiagnosticSummary, WordsError> {
    prepare_workspace(&config.paths)?;

    let sink: Arc<dyn EventSink> = Arc::new(FileEventSink::open(&config.paths.log_file)?);
    sink.info(
        Category::Utility,
        &format!(
            "Refreshed contents of log file `{}`",
            config.paths.log_file.display()
        ),
    );

    let mut timing = RunTiming::start();
    let stamp = RunStamp::from_datetime(&timing.started_at);
    tracing::info!("Starting run {}", stamp);

    if let Err(e) = guarded_run(config, stamp, sink.clone()).await {
        sink.error(
            Category::Scraper,
            &format!("An error occurred during execution: {}", e),
        );
    }

    timing.finish();

    let aggregator = DiagnosticsAggregator::for_directory(
        &config.paths.output_dir,
        &config.paths.log_file,
        sink,
    );
    Ok(aggregator.summarize(Some(&timing)))
}

/// Re-derives the summary from the latest artifacts without crawling
///
/// The run log is appended to, not truncated.
pub fn run_diagnostics_only(config: &Config) -> Result<DiagnosticSummary, WordsError> {
    let sink: Arc<dyn EventSink> = Arc::new(FileEventSink::open(&config.paths.log_file)?);
    let aggregator = DiagnosticsAggregator::for_directory(
        &config.paths.output_dir,
        &config.paths.log_file,
        sink,
    );
    Ok(aggregator.summarize(None))
}

async fn guarded_run(
    config: &Config,
    stamp: RunStamp,
    sink: Arc<dyn EventSink>,
) -> Result<(), WordsError> {
    let sites = load_sites(&config.paths.input, sink.as_ref());

    let coordinator = RunCoordinator::from_config(config, sink.clone())?;
    let results = coordinator.run(&sites).await;

    let writer = OutputWriter::new(&config.paths.output_dir, stamp, sink.clone());
    writer.write_tables(&results);

    transcode_log(&config.paths.output_dir, &config.paths.log_file, sink)?;
    Ok(())
}

fn transcode_log(
    output_dir: &Path,
    log_file: &Path,
    sink: Arc<dyn EventSink>,
) -> Result<(), WordsError> {
    let table = LogTranscoder::new(output_dir, sink).transcode(log_file)?;
    tracing::info!(
        "Log table saved to {} ({} records)",
        table.path.display(),
        table.records.len()
    );
    Ok(())
}
