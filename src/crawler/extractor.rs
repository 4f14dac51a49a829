//! Page extraction: one fetch, then parsing

use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::parser::{parse_html, PageExtract};
use crate::events::{Category, EventSink, MARKER_FETCH_ERROR, MARKER_FETCH_SUCCESS, MARKER_TIMEOUT};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Fetches single pages and extracts their words and metrics
pub struct PageExtractor {
    client: Client,
    sink: Arc<dyn EventSink>,
    timeout: Duration,
}

impl PageExtractor {
    pub fn new(client: Client, sink: Arc<dyn EventSink>, timeout: Duration) -> Self {
        Self {
            client,
            sink,
            timeout,
        }
    }

    /// Fetches `url` and extracts its records
    ///
    /// Exactly one request is made. Any failure is logged and reported as
    /// `None`, which callers treat as "skip this site".
    pub async fn fetch(&self, url: &str) -> Option<PageExtract> {
        match fetch_url(&self.client, url, self.timeout).await {
            FetchResult::Success { body, .. } => {
                self.sink.info(
                    Category::Scraper,
                    &format!("{} {}", MARKER_FETCH_SUCCESS, url),
                );

                let extract = parse_html(&body);
                self.sink.info(
                    Category::Scraper,
                    &format!(
                        "Word count completed for {} ({} distinct words)",
                        url,
                        extract.words.len()
                    ),
                );
                Some(extract)
            }
            FetchResult::HttpError { status_code } => {
                self.sink.error(
                    Category::Scraper,
                    &format!("{} {}: HTTP {}", MARKER_FETCH_ERROR, url, status_code),
                );
                None
            }
            FetchResult::NetworkError { error, timed_out } => {
                let message = if timed_out {
                    format!(
                        "{} {}: {} after {}s",
                        MARKER_FETCH_ERROR,
                        url,
                        MARKER_TIMEOUT,
                        self.timeout.as_secs()
                    )
                } else {
                    format!("{} {}: {}", MARKER_FETCH_ERROR, url, error)
                };
                self.sink.error(Category::Scraper, &message);
                None
            }
        }
    }
}
