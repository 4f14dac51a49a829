//! Output module for run artifacts
//!
//! This module handles:
//! - Writing and sorting the word and site tables
//! - Transcoding the run log into the log table
//! - Locating artifacts and deriving the diagnostic summary

pub mod diagnostics;
pub mod log_table;
pub mod stamp;
pub mod stats;
pub mod tables;
mod traits;

pub use diagnostics::{
    scan_log, DataOutput, DiagnosticSummary, DiagnosticsAggregator, LocatedArtifacts,
    LogMetrics, RunTime, RunTiming, SiteMetrics, WordMetrics,
};
pub use log_table::{parse_log, parse_log_line, LogRecord, LogTable, LogTranscoder};
pub use stamp::{RunStamp, RUN_STAMP_FORMAT};
pub use stats::{print_summary, SummaryReport};
pub use tables::{sort_table_file, OutputWriter, SiteRow, TablePaths, WordRow};
pub use traits::{
    ArtifactKind, ArtifactLocator, DirectoryLocator, FixedLocator, OutputError, OutputResult,
};
