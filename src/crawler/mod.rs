//! Crawler module for fetching and processing target sites
//!
//! This module contains the core crawl path, including:
//! - HTTP fetching with per-request timeouts
//! - HTML parsing into word histograms and page metrics
//! - Sequential, permission-gated run coordination
//! - The end-to-end run pipeline

mod coordinator;
mod extractor;
mod fetcher;
mod parser;
mod pipeline;

pub use coordinator::{CrawlResults, RunCoordinator, SiteResult};
pub use extractor::PageExtractor;
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use parser::{
    normalize_token, parse_html, PageExtract, PageMetrics, WordHistogram, NOT_AVAILABLE,
};
pub use pipeline::{prepare_workspace, run_diagnostics_only, run_pipeline};
