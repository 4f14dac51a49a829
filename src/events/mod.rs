//! Run event sink
//!
//! Every component that reports progress receives an [`EventSink`] instead of
//! writing to a global logger. The file-backed sink produces the run log that
//! the log transcoder and the diagnostics pass read back after the run, so
//! the line format and the marker phrases below are a contract between the
//! writers and those readers.
//!
//! Line format: `{timestamp} - {LEVEL} - {category prefix}{message}`

mod file_sink;
mod memory_sink;

pub use file_sink::FileEventSink;
pub use memory_sink::MemoryEventSink;

use std::fmt;

/// Timestamp format of a run log line (`2024-10-17 09:30:01,123`)
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Separator between the timestamp, level, and message of a log line
pub const LOG_SEPARATOR: &str = " - ";

/// Logged after a page body was received
pub const MARKER_FETCH_SUCCESS: &str = "Successfully fetched";

/// Logged when a page fetch fails for any reason
pub const MARKER_FETCH_ERROR: &str = "Error fetching";

/// Logged whenever a request gives up waiting for a response
pub const MARKER_TIMEOUT: &str = "Timeout occurred";

/// Logged when robots.txt rules exclude a site
pub const MARKER_DISALLOWED_SKIP: &str = "due to disallowed path";

/// Severity of a run event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    /// The level keyword written into the log line
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which part of the pipeline produced an event
///
/// Robots and utility events carry a short message prefix; scraper events
/// carry none. The diagnostics pass classifies log lines by this prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Robots,
    Utility,
    Scraper,
}

impl Category {
    /// Prefix written in front of the message
    pub fn prefix(&self) -> &'static str {
        match self {
            Category::Robots => "R- ",
            Category::Utility => "U- ",
            Category::Scraper => "",
        }
    }

    /// Classifies a log message by its prefix
    pub fn of_message(message: &str) -> Self {
        if message.starts_with("R-") {
            Category::Robots
        } else if message.starts_with("U-") {
            Category::Utility
        } else {
            Category::Scraper
        }
    }
}

/// A single run event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub level: Level,
    pub category: Category,
    pub message: String,
}

impl Event {
    pub fn new(level: Level, category: Category, message: impl Into<String>) -> Self {
        Self {
            level,
            category,
            message: message.into(),
        }
    }

    /// Renders the event as one run log line (without trailing newline)
    ///
    /// Embedded newlines are flattened so that one event is always one line.
    pub fn render(&self, timestamp: &str) -> String {
        let message = self.message.replace(['\r', '\n'], " ");
        format!(
            "{}{sep}{}{sep}{}{}",
            timestamp,
            self.level,
            self.category.prefix(),
            message,
            sep = LOG_SEPARATOR
        )
    }

    /// Mirrors the event to the `tracing` subscriber
    pub fn trace(&self) {
        let prefix = self.category.prefix();
        match self.level {
            Level::Info => tracing::info!("{}{}", prefix, self.message),
            Level::Warning => tracing::warn!("{}{}", prefix, self.message),
            Level::Error => tracing::error!("{}{}", prefix, self.message),
        }
    }
}

/// Append-only destination for run events
pub trait EventSink: Send + Sync {
    /// Appends one event
    fn record(&self, event: Event);

    fn info(&self, category: Category, message: &str) {
        self.record(Event::new(Level::Info, category, message));
    }

    fn warning(&self, category: Category, message: &str) {
        self.record(Event::new(Level::Warning, category, message));
    }

    fn error(&self, category: Category, message: &str) {
        self.record(Event::new(Level::Error, category, message));
    }
}

/// Current local time in run log format
pub fn log_timestamp() -> String {
    chrono::Local::now().format(LOG_TIMESTAMP_FORMAT).to_string()
}
