//! Configuration module for Website Words
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing keys fall back to the defaults the
//! crawler has always used.
//!
//! # Example
//!
//! ```no_run
//! use website_words::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("website-words.toml")).unwrap();
//! println!("Robots attempts per protocol: {}", config.crawler.robots_max_attempts);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, PathsConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
