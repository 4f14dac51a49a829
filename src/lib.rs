//! Website Words: a polite batch word-frequency crawler
//!
//! This crate reads a list of target sites, checks each site's robots.txt,
//! fetches every allowed page once, and turns the HTML into a word histogram
//! and a structural-metrics record. Results are written as timestamped CSV
//! tables, the run log is transcoded into a third table, and a diagnostics
//! pass re-reads all artifacts to produce a JSON summary.

pub mod config;
pub mod crawler;
pub mod events;
pub mod output;
pub mod robots;
pub mod site;
pub mod url;

use thiserror::Error;

/// Main error type for Website Words operations
#[derive(Debug, Error)]
pub enum WordsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing domain in URL: {0}")]
    MissingDomain(String),
}

/// Result type alias for Website Words operations
pub type Result<T> = std::result::Result<T, WordsError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use events::{EventSink, FileEventSink, MemoryEventSink};
pub use site::SiteRecord;
pub use url::extract_domain;
