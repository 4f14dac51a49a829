use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Website Words
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Attempts per protocol when fetching robots.txt times out
    #[serde(rename = "robots-max-attempts")]
    pub robots_max_attempts: u32,

    /// Per-request timeout for robots.txt fetches (seconds)
    #[serde(rename = "robots-timeout-secs")]
    pub robots_timeout_secs: u64,

    /// Per-request timeout for page fetches (seconds)
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,

    /// Pause after each processed site (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,
}

impl CrawlerConfig {
    pub fn robots_timeout(&self) -> Duration {
        Duration::from_secs(self.robots_timeout_secs)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            robots_max_attempts: 3,
            robots_timeout_secs: 5,
            page_timeout_secs: 30,
            request_delay_ms: 100,
        }
    }
}

/// User agent sent with every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Full User-Agent header value
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: "Mozilla/5.0".to_string(),
        }
    }
}

/// Locations of the input list, output tables, and run log
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// CSV list of sites to crawl
    pub input: PathBuf,

    /// Directory receiving the timestamped tables and summary
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// Raw run log, truncated at the start of every run
    #[serde(rename = "log-file")]
    pub log_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/input/url-list.csv"),
            output_dir: PathBuf::from("data/output"),
            log_file: PathBuf::from("logs/scraper.log"),
        }
    }
}
