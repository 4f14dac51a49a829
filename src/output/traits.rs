//! Output error types and the artifact discovery seam
//!
//! Every artifact lives in the output directory under a name of the form
//! `{run stamp}-{kind suffix}`, e.g. `20241017-0930-word-data.csv`.

use crate::output::stamp::RunStamp;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Column '{column}' missing from {path}")]
    MissingColumn { column: String, path: String },

    #[error("Invalid value '{value}' in column '{column}' of {path}")]
    InvalidValue {
        column: String,
        value: String,
        path: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// The artifacts a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    WordTable,
    SiteTable,
    LogTable,
    Summary,
}

impl ArtifactKind {
    /// File name suffix following the run stamp
    pub fn suffix(&self) -> &'static str {
        match self {
            ArtifactKind::WordTable => "word-data.csv",
            ArtifactKind::SiteTable => "site-data.csv",
            ArtifactKind::LogTable => "log-data.csv",
            ArtifactKind::Summary => "diagnostic-summary.json",
        }
    }

    /// File name for this kind under the given stamp
    pub fn file_name(&self, stamp: &RunStamp) -> String {
        format!("{}-{}", stamp, self.suffix())
    }

    /// Full path for this kind under the given stamp
    pub fn path_in(&self, dir: &Path, stamp: &RunStamp) -> PathBuf {
        dir.join(self.file_name(stamp))
    }

    /// Splits a file name of this kind into its stamp
    ///
    /// Returns `None` for names of other kinds or without a valid stamp.
    pub fn stamp_of(&self, file_name: &str) -> Option<RunStamp> {
        let (stamp, rest) = RunStamp::split_file_name(file_name)?;
        (rest == self.suffix()).then_some(stamp)
    }
}

/// Finds the artifact of a given kind that diagnostics should read
pub trait ArtifactLocator: Send + Sync {
    fn latest(&self, kind: ArtifactKind) -> Option<PathBuf>;
}

/// Locates artifacts by scanning a directory
///
/// # Selection Rule
///
/// Among files named `{stamp}-{suffix}` for the requested kind, the greatest
/// stamp wins. Files sharing a stamp are ordered by modification time, most
/// recent first. Files with unparseable stamps are ignored.
#[derive(Debug, Clone)]
pub struct DirectoryLocator {
    dir: PathBuf,
}

impl DirectoryLocator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactLocator for DirectoryLocator {
    fn latest(&self, kind: ArtifactKind) -> Option<PathBuf> {
        let entries = std::fs::read_dir(&self.dir).ok()?;

        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                let stamp = kind.stamp_of(&name)?;
                let modified = entry
                    .metadata()
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                Some((stamp, modified, entry.path()))
            })
            .max_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, _, path)| path)
    }
}

/// Locator returning fixed paths, for replaying a specific run's artifacts
#[derive(Debug, Clone, Default)]
pub struct FixedLocator {
    paths: HashMap<ArtifactKind, PathBuf>,
}

impl FixedLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ArtifactKind, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(kind, path.into());
        self
    }
}

impl ArtifactLocator for FixedLocator {
    fn latest(&self, kind: ArtifactKind) -> Option<PathBuf> {
        self.paths.get(&kind).cloned()
    }
}
