//! Post-run diagnostics
//!
//! The aggregator never looks at in-memory crawl state. It re-reads the
//! artifacts the run left on disk (word table, site table, raw run log),
//! derives summary metrics from them, writes the JSON summary, and then
//! renames any table whose stamp disagrees with the word table's.

use crate::events::{
    Category, EventSink, Level, MARKER_DISALLOWED_SKIP, MARKER_FETCH_ERROR,
    MARKER_FETCH_SUCCESS, MARKER_TIMEOUT,
};
use crate::output::log_table::parse_log_line;
use crate::output::stamp::RunStamp;
use crate::output::traits::{
    ArtifactKind, ArtifactLocator, DirectoryLocator, OutputError, OutputResult,
};
use chrono::{DateTime, Local};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Date format of the `Date` field
pub const SUMMARY_DATE_FORMAT: &str = "%m-%d-%Y";

/// Wall clock bounds of a run
#[derive(Debug, Clone, Copy)]
pub struct RunTiming {
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
}

impl RunTiming {
    /// Starts timing now
    pub fn start() -> Self {
        Self {
            started_at: Local::now(),
            finished_at: None,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    /// Summary block for this timing
    pub fn run_time(&self) -> RunTime {
        let start = epoch_seconds(&self.started_at);
        let end = self.finished_at.as_ref().map(epoch_seconds);

        RunTime {
            date: Some(self.started_at.format(SUMMARY_DATE_FORMAT).to_string()),
            start_time: Some(start),
            end_time: end,
            duration: end.map(|end| end - start),
        }
    }
}

fn epoch_seconds(at: &DateTime<Local>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunTime {
    pub date: Option<String>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataOutput {
    pub log_file: Option<String>,
    pub site_file: Option<String>,
    pub word_file: Option<String>,
    pub log_file_size_b: Option<u64>,
    pub site_file_size_b: Option<u64>,
    pub word_file_size_b: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WordMetrics {
    /// Rows in the word table
    pub total_words: u64,
    /// Distinct `Word` values across all sites
    pub unique_words: u64,
    pub sum_counts: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SiteMetrics {
    pub sum_image_count: u64,
    pub sum_link_count: u64,
    pub sum_form_count: u64,
    pub sum_stylesheet_count: u64,
    pub sum_script_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogMetrics {
    pub urls_attempted: u64,
    pub url_timeouts: u64,
    pub disallowed_skip_count: u64,
    pub level_info_count: u64,
    pub level_warning_count: u64,
    pub level_error_count: u64,
    pub robot_log_count: u64,
    pub utility_log_count: u64,
    pub scraper_log_count: u64,
}

/// The JSON diagnostic summary of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticSummary {
    pub run_time: RunTime,
    pub data_output: DataOutput,
    pub word_metrics: WordMetrics,
    pub site_metrics: SiteMetrics,
    pub log_metrics: LogMetrics,
}

/// Table files picked for a diagnostics pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatedArtifacts {
    pub word_table: Option<PathBuf>,
    pub site_table: Option<PathBuf>,
    pub log_table: Option<PathBuf>,
}

/// Derives the diagnostic summary from a run's artifacts
pub struct DiagnosticsAggregator {
    output_dir: PathBuf,
    log_file: PathBuf,
    locator: Box<dyn ArtifactLocator>,
    sink: Arc<dyn EventSink>,
}

impl DiagnosticsAggregator {
    /// # Arguments
    ///
    /// * `output_dir` - Where the summary is written and tables are renamed
    /// * `log_file` - Raw run log scanned for log metrics
    /// * `locator` - Picks which table files to read
    /// * `sink` - Run event sink
    pub fn new(
        output_dir: impl Into<PathBuf>,
        log_file: impl Into<PathBuf>,
        locator: Box<dyn ArtifactLocator>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            log_file: log_file.into(),
            locator,
            sink,
        }
    }

    /// Aggregator that picks the latest tables in `output_dir`
    pub fn for_directory(
        output_dir: impl Into<PathBuf>,
        log_file: impl Into<PathBuf>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let output_dir = output_dir.into();
        let locator = Box::new(DirectoryLocator::new(output_dir.clone()));
        Self::new(output_dir, log_file, locator, sink)
    }

    pub fn locate(&self) -> LocatedArtifacts {
        LocatedArtifacts {
            word_table: self.locator.latest(ArtifactKind::WordTable),
            site_table: self.locator.latest(ArtifactKind::SiteTable),
            log_table: self.locator.latest(ArtifactKind::LogTable),
        }
    }

    /// Computes every metric block without writing anything
    ///
    /// A table or log that cannot be read leaves its block at zero.
    pub fn compute(&self, timing: Option<&RunTiming>, located: &LocatedArtifacts) -> DiagnosticSummary {
        let mut summary = DiagnosticSummary {
            run_time: timing.map(RunTiming::run_time).unwrap_or_default(),
            data_output: DataOutput {
                log_file: located.log_table.as_deref().map(display_path),
                site_file: located.site_table.as_deref().map(display_path),
                word_file: located.word_table.as_deref().map(display_path),
                log_file_size_b: located.log_table.as_deref().and_then(file_size),
                site_file_size_b: located.site_table.as_deref().and_then(file_size),
                word_file_size_b: located.word_table.as_deref().and_then(file_size),
            },
            ..DiagnosticSummary::default()
        };

        if let Some(path) = &located.word_table {
            match word_metrics(path) {
                Ok(metrics) => summary.word_metrics = metrics,
                Err(e) => self.sink.warning(
                    Category::Utility,
                    &format!("Could not compute word metrics from `{}`: {}", path.display(), e),
                ),
            }
        }

        if let Some(path) = &located.site_table {
            match site_metrics(path) {
                Ok(metrics) => summary.site_metrics = metrics,
                Err(e) => self.sink.warning(
                    Category::Utility,
                    &format!("Could not compute site metrics from `{}`: {}", path.display(), e),
                ),
            }
        }

        match std::fs::read_to_string(&self.log_file) {
            Ok(content) => summary.log_metrics = scan_log(&content),
            Err(e) => self.sink.warning(
                Category::Utility,
                &format!("Could not read run log `{}`: {}", self.log_file.display(), e),
            ),
        }

        summary
    }

    /// Writes `{stamp}-diagnostic-summary.json`
    ///
    /// The stamp is taken from the word table's file name, or minted now when
    /// there is no word table.
    pub fn write_summary(
        &self,
        summary: &DiagnosticSummary,
        word_table: Option<&Path>,
    ) -> OutputResult<PathBuf> {
        let stamp = word_table
            .and_then(stamp_of_table(ArtifactKind::WordTable))
            .unwrap_or_else(RunStamp::now);
        let path = ArtifactKind::Summary.path_in(&self.output_dir, &stamp);

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        summary.serialize(&mut serializer)?;
        std::fs::write(&path, buf)?;

        Ok(path)
    }

    /// Renames site and log tables to carry the word table's stamp
    ///
    /// Returns the new paths of the renamed files. Does nothing when there is
    /// no word table. A file is never renamed onto an existing artifact.
    pub fn reconcile(&self, located: &LocatedArtifacts) -> OutputResult<Vec<PathBuf>> {
        let Some(word_stamp) = located
            .word_table
            .as_deref()
            .and_then(stamp_of_table(ArtifactKind::WordTable))
        else {
            return Ok(Vec::new());
        };

        let mut renamed = Vec::new();
        for (kind, path) in [
            (ArtifactKind::SiteTable, &located.site_table),
            (ArtifactKind::LogTable, &located.log_table),
        ] {
            let Some(path) = path else { continue };
            if stamp_of_table(kind)(path.as_path()).as_ref() == Some(&word_stamp) {
                continue;
            }

            let dir = path.parent().unwrap_or(&self.output_dir);
            let target = kind.path_in(dir, &word_stamp);
            if target.exists() {
                self.sink.warning(
                    Category::Utility,
                    &format!(
                        "Not renaming `{}`: `{}` already exists",
                        path.display(),
                        target.display()
                    ),
                );
                continue;
            }
            std::fs::rename(path, &target)?;
            self.sink.info(
                Category::Utility,
                &format!("Renamed `{}` to `{}`", path.display(), target.display()),
            );
            renamed.push(target);
        }

        Ok(renamed)
    }

    /// Full diagnostics pass: locate, compute, write, reconcile
    ///
    /// Never fails; write and rename errors are logged.
    pub fn summarize(&self, timing: Option<&RunTiming>) -> DiagnosticSummary {
        let located = self.locate();
        if located.word_table.is_none() {
            self.sink.warning(
                Category::Utility,
                &format!("No word table found in `{}`", self.output_dir.display()),
            );
        }

        let summary = self.compute(timing, &located);

        match self.write_summary(&summary, located.word_table.as_deref()) {
            Ok(path) => self.sink.info(
                Category::Utility,
                &format!("Diagnostic summary saved to `{}`", path.display()),
            ),
            Err(e) => self.sink.error(
                Category::Utility,
                &format!("Error saving diagnostic summary: {}", e),
            ),
        }

        if let Err(e) = self.reconcile(&located) {
            self.sink.error(
                Category::Utility,
                &format!("Error reconciling artifact stamps: {}", e),
            );
        }

        summary
    }
}

/// Scans raw run log text line by line
///
/// Lines are classified by message prefix and by level keyword (INFO, then
/// WARNING, then ERROR; first match wins). Marker phrases are counted once
/// per line.
pub fn scan_log(content: &str) -> LogMetrics {
    let mut metrics = LogMetrics::default();

    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        let record = parse_log_line(line);
        let (level_field, message) = match &record {
            Some(record) => (record.log_level.as_str(), record.message.as_str()),
            None => (line, line),
        };

        match Category::of_message(message) {
            Category::Robots => metrics.robot_log_count += 1,
            Category::Utility => metrics.utility_log_count += 1,
            Category::Scraper => metrics.scraper_log_count += 1,
        }

        match level_of(level_field) {
            Some(Level::Info) => metrics.level_info_count += 1,
            Some(Level::Warning) => metrics.level_warning_count += 1,
            Some(Level::Error) => metrics.level_error_count += 1,
            None => {}
        }

        if line.contains(MARKER_FETCH_SUCCESS) || line.contains(MARKER_FETCH_ERROR) {
            metrics.urls_attempted += 1;
        }
        if line.contains(MARKER_TIMEOUT) {
            metrics.url_timeouts += 1;
        }
        if line.contains(MARKER_DISALLOWED_SKIP) {
            metrics.disallowed_skip_count += 1;
        }
    }

    metrics
}

fn level_of(text: &str) -> Option<Level> {
    [Level::Info, Level::Warning, Level::Error]
        .into_iter()
        .find(|level| text.contains(level.as_str()))
}

fn word_metrics(path: &Path) -> OutputResult<WordMetrics> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let word_idx = column_index(&headers, "Word", path)?;
    let count_idx = column_index(&headers, "Count", path)?;

    let mut metrics = WordMetrics::default();
    let mut unique = HashSet::new();
    for record in reader.records() {
        let record = record?;
        unique.insert(record.get(word_idx).unwrap_or("").to_string());
        metrics.sum_counts += parse_count(&record, count_idx, "Count", path)?;
        metrics.total_words += 1;
    }
    metrics.unique_words = unique.len() as u64;

    Ok(metrics)
}

fn site_metrics(path: &Path) -> OutputResult<SiteMetrics> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    // Absent counter columns contribute zero
    let columns = [
        "ImageCount",
        "LinkCount",
        "FormCount",
        "StylesheetCount",
        "ScriptCount",
    ]
    .map(|name| (name, headers.iter().position(|h| h == name)));

    let mut sums = [0u64; 5];
    for record in reader.records() {
        let record = record?;
        for (sum, (name, idx)) in sums.iter_mut().zip(columns.iter()) {
            if let Some(idx) = idx {
                *sum += parse_count(&record, *idx, name, path)?;
            }
        }
    }

    let [images, links, forms, stylesheets, scripts] = sums;
    Ok(SiteMetrics {
        sum_image_count: images,
        sum_link_count: links,
        sum_form_count: forms,
        sum_stylesheet_count: stylesheets,
        sum_script_count: scripts,
    })
}

fn column_index(headers: &StringRecord, column: &str, path: &Path) -> OutputResult<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| OutputError::MissingColumn {
            column: column.to_string(),
            path: path.display().to_string(),
        })
}

fn parse_count(record: &StringRecord, idx: usize, column: &str, path: &Path) -> OutputResult<u64> {
    let value = record.get(idx).unwrap_or("").trim();
    value.parse().map_err(|_| OutputError::InvalidValue {
        column: column.to_string(),
        value: value.to_string(),
        path: path.display().to_string(),
    })
}

fn stamp_of_table(kind: ArtifactKind) -> impl Fn(&Path) -> Option<RunStamp> {
    move |path: &Path| kind.stamp_of(path.file_name()?.to_str()?)
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn file_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path).ok().map(|m| m.len())
}
