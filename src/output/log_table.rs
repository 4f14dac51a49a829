//! Run log transcoding
//!
//! Converts the raw run log into a three-column CSV table. Lines that do not
//! split into at least a timestamp, a level, and a message are dropped.

use crate::events::{Category, EventSink, LOG_SEPARATOR};
use crate::output::stamp::RunStamp;
use crate::output::traits::{ArtifactKind, OutputResult};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Header of the log table
pub const LOG_TABLE_HEADERS: [&str; 3] = ["Timestamp", "LogLevel", "Message"];

/// One parsed run log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogRecord {
    pub timestamp: String,
    pub log_level: String,
    pub message: String,
}

/// Parses one run log line
///
/// The message keeps any further separators it contains and is trimmed.
/// Returns `None` for lines with fewer than three segments.
pub fn parse_log_line(line: &str) -> Option<LogRecord> {
    let mut parts = line.splitn(3, LOG_SEPARATOR);
    let timestamp = parts.next()?;
    let log_level = parts.next()?;
    let message = parts.next()?;

    Some(LogRecord {
        timestamp: timestamp.to_string(),
        log_level: log_level.to_string(),
        message: message.trim().to_string(),
    })
}

/// Parses every well-formed line of a run log
pub fn parse_log(content: &str) -> Vec<LogRecord> {
    content.lines().filter_map(parse_log_line).collect()
}

/// A written log table
#[derive(Debug, Clone)]
pub struct LogTable {
    pub path: PathBuf,
    pub records: Vec<LogRecord>,
}

/// Writes `{stamp}-log-data.csv` from a raw run log
pub struct LogTranscoder {
    output_dir: PathBuf,
    sink: Arc<dyn EventSink>,
}

impl LogTranscoder {
    pub fn new(output_dir: impl Into<PathBuf>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            output_dir: output_dir.into(),
            sink,
        }
    }

    /// Transcodes the log under a stamp minted now
    ///
    /// The stamp can differ from the one the word and site tables carry when
    /// the run crosses a minute boundary; diagnostics reconciles the names.
    pub fn transcode(&self, log_path: &Path) -> OutputResult<LogTable> {
        self.transcode_with_stamp(log_path, &RunStamp::now())
    }

    pub fn transcode_with_stamp(&self, log_path: &Path, stamp: &RunStamp) -> OutputResult<LogTable> {
        // Announce before reading so the line lands in the table too
        self.sink.info(
            Category::Utility,
            &format!("Transcoding run log `{}`", log_path.display()),
        );

        let content = std::fs::read_to_string(log_path)?;
        let records = parse_log(&content);

        let path = ArtifactKind::LogTable.path_in(&self.output_dir, stamp);
        let mut writer = WriterBuilder::new().has_headers(false).from_path(&path)?;
        writer.write_record(LOG_TABLE_HEADERS)?;
        for record in &records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        tracing::debug!("Wrote {} log records to {}", records.len(), path.display());
        Ok(LogTable { path, records })
    }
}
