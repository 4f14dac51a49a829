//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop, which for each site in input
//! order:
//! - Resolves robots.txt permissions
//! - Skips the site if a disallowed prefix occurs in its URL
//! - Fetches and extracts the page
//! - Stores the word histogram and the site row
//! - Pauses before the next site
//!
//! Sites are processed strictly one at a time. No failure of a single site
//! ends the run.

use crate::config::Config;
use crate::crawler::build_http_client;
use crate::crawler::extractor::PageExtractor;
use crate::crawler::parser::{PageMetrics, WordHistogram};
use crate::events::{Category, EventSink, MARKER_DISALLOWED_SKIP};
use crate::robots::{HttpRobotsTransport, PermissionResolver};
use crate::site::SiteRecord;
use crate::WordsError;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Derived records for one successfully extracted site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteResult {
    pub site: SiteRecord,
    pub words: WordHistogram,
    pub metrics: PageMetrics,
}

/// Everything collected during a run, keyed by Website
///
/// A Website listed twice keeps only the later result.
#[derive(Debug, Clone, Default)]
pub struct CrawlResults {
    sites: BTreeMap<String, SiteResult>,

    /// Sites skipped because robots.txt disallowed them
    pub disallowed: usize,

    /// Sites whose page could not be fetched
    pub failed: usize,
}

impl CrawlResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, result: SiteResult) {
        self.sites.insert(result.site.website.clone(), result);
    }

    pub fn get(&self, website: &str) -> Option<&SiteResult> {
        self.sites.get(website)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Results ordered by Website
    pub fn iter(&self) -> btree_map::Values<'_, String, SiteResult> {
        self.sites.values()
    }
}

/// Main crawler coordinator structure
pub struct RunCoordinator {
    resolver: PermissionResolver,
    extractor: PageExtractor,
    sink: Arc<dyn EventSink>,
    delay: Duration,
}

impl RunCoordinator {
    /// Creates a coordinator from its parts
    ///
    /// # Arguments
    ///
    /// * `resolver` - Robots.txt permission resolver
    /// * `extractor` - Page fetcher and parser
    /// * `sink` - Run event sink
    /// * `delay` - Pause after each site that was fetched
    pub fn new(
        resolver: PermissionResolver,
        extractor: PageExtractor,
        sink: Arc<dyn EventSink>,
        delay: Duration,
    ) -> Self {
        Self {
            resolver,
            extractor,
            sink,
            delay,
        }
    }

    /// Creates a coordinator wired to real HTTP transports
    ///
    /// # Returns
    ///
    /// * `Ok(RunCoordinator)` - Ready to run
    /// * `Err(WordsError)` - The HTTP client could not be built
    pub fn from_config(config: &Config, sink: Arc<dyn EventSink>) -> Result<Self, WordsError> {
        let client = build_http_client(&config.user_agent)?;

        let transport = Arc::new(HttpRobotsTransport::new(
            client.clone(),
            config.crawler.robots_timeout(),
        ));
        let resolver = PermissionResolver::new(
            transport,
            sink.clone(),
            config.crawler.robots_max_attempts,
        );
        let extractor = PageExtractor::new(client, sink.clone(), config.crawler.page_timeout());

        Ok(Self::new(
            resolver,
            extractor,
            sink,
            config.crawler.request_delay(),
        ))
    }

    /// Runs the crawl over all sites in input order
    pub async fn run(&self, sites: &[SiteRecord]) -> CrawlResults {
        let mut results = CrawlResults::new();
        let start_time = std::time::Instant::now();

        for site in sites {
            self.process_site(site, &mut results).await;
        }

        tracing::info!(
            "Crawl finished: {} extracted, {} disallowed, {} failed in {:?}",
            results.len(),
            results.disallowed,
            results.failed,
            start_time.elapsed()
        );

        results
    }

    /// Processes a single site
    async fn process_site(&self, site: &SiteRecord, results: &mut CrawlResults) {
        let url = site.website.as_str();
        self.sink.info(
            Category::Scraper,
            &format!(
                "Details for website {}: Institution={}, Category={}, State={}, City={}",
                url, site.institution, site.category, site.state, site.city
            ),
        );

        let disallowed = self.resolver.resolve(url).await;
        if let Some(prefix) = disallowed.matching_prefix(url) {
            self.sink.info(
                Category::Scraper,
                &format!("Skipping {} {} ({}).", url, MARKER_DISALLOWED_SKIP, prefix),
            );
            results.disallowed += 1;
            return;
        }

        match self.extractor.fetch(url).await {
            Some(page) => results.insert(SiteResult {
                site: site.clone(),
                words: page.words,
                metrics: page.metrics,
            }),
            None => {
                self.sink
                    .error(Category::Scraper, &format!("Skipping {} after fetch failure.", url));
                results.failed += 1;
            }
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
