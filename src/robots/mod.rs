//! Robots.txt handling module
//!
//! This module resolves a site's crawl permissions: it downloads robots.txt
//! over HTTPS and then HTTP, retrying only on timeouts, and reduces the
//! document to the wildcard group's disallowed path prefixes.
//!
//! When no robots document can be obtained the site is treated as
//! unrestricted.

mod parser;
mod transport;

pub use parser::DisallowList;
pub use transport::{HttpRobotsTransport, RobotsTransport, TransportError};

use crate::events::{Category, EventSink, MARKER_TIMEOUT};
use crate::url::extract_domain;
use std::sync::Arc;

/// Protocols tried in order when fetching robots.txt
pub const ROBOTS_PROTOCOLS: [&str; 2] = ["https", "http"];

/// Resolves crawl permissions for sites
///
/// Nothing is cached between calls; every call fetches robots.txt anew.
pub struct PermissionResolver {
    transport: Arc<dyn RobotsTransport>,
    sink: Arc<dyn EventSink>,
    max_attempts: u32,
}

impl PermissionResolver {
    /// Creates a resolver
    ///
    /// # Arguments
    ///
    /// * `transport` - How robots.txt is downloaded
    /// * `sink` - Receives one event per attempt outcome
    /// * `max_attempts` - Attempts per protocol when requests time out
    pub fn new(
        transport: Arc<dyn RobotsTransport>,
        sink: Arc<dyn EventSink>,
        max_attempts: u32,
    ) -> Self {
        Self {
            transport,
            sink,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Resolves the disallowed path prefixes for a site
    ///
    /// `target` may be a full URL or a bare domain. A target whose domain
    /// cannot be determined, or whose robots.txt cannot be fetched on either
    /// protocol, resolves to an empty list.
    pub async fn resolve(&self, target: &str) -> DisallowList {
        let domain = match domain_of(target) {
            Some(domain) => domain,
            None => {
                self.sink.warning(
                    Category::Robots,
                    &format!(
                        "Could not determine domain of {}, assuming no restrictions.",
                        target
                    ),
                );
                return DisallowList::allow_all();
            }
        };

        let Some(content) = self.fetch_robots(&domain).await else {
            self.sink.warning(
                Category::Robots,
                &format!("No robots.txt found for {}, assuming no restrictions.", domain),
            );
            return DisallowList::allow_all();
        };

        let disallowed = DisallowList::from_content(&content);
        self.sink.info(
            Category::Robots,
            &format!(
                "Disallowed paths for domain {}: {}",
                domain,
                disallowed.describe()
            ),
        );
        disallowed
    }

    /// Downloads robots.txt for a domain
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Success | Return body |
    /// | Timeout | Retry same protocol, up to `max_attempts` total |
    /// | Any other failure | Abandon protocol, move to the next |
    ///
    /// # Returns
    ///
    /// * `Some(String)` - The robots.txt body
    /// * `None` - Both protocols were exhausted
    pub async fn fetch_robots(&self, domain: &str) -> Option<String> {
        for protocol in ROBOTS_PROTOCOLS {
            let robots_url = format!("{}://{}/robots.txt", protocol, domain);

            for attempt in 1..=self.max_attempts {
                match self.transport.get(&robots_url).await {
                    Ok(body) => {
                        self.sink.info(
                            Category::Robots,
                            &format!("Successfully read robots.txt from {}", robots_url),
                        );
                        return Some(body);
                    }
                    Err(TransportError::Timeout) => {
                        self.sink.warning(
                            Category::Robots,
                            &format!(
                                "{} while fetching {}. Attempt {} of {}.",
                                MARKER_TIMEOUT, robots_url, attempt, self.max_attempts
                            ),
                        );
                        if attempt == self.max_attempts {
                            self.sink.warning(
                                Category::Robots,
                                &format!(
                                    "Giving up on {} after {} attempts.",
                                    robots_url, self.max_attempts
                                ),
                            );
                        }
                    }
                    Err(TransportError::Failed(reason)) => {
                        self.sink.warning(
                            Category::Robots,
                            &format!(
                                "Failed to find {}: {}, trying next protocol...",
                                robots_url, reason
                            ),
                        );
                        break;
                    }
                }
            }
        }

        self.sink.warning(
            Category::Robots,
            &format!(
                "Failed to obtain robots.txt for domain {} using both HTTP and HTTPS.",
                domain
            ),
        );
        None
    }
}

/// Domain of a URL, or the target itself when it is already a bare domain
fn domain_of(target: &str) -> Option<String> {
    let target = target.trim();
    if target.contains("://") {
        extract_domain(target).ok()
    } else if target.is_empty() || target.contains('/') {
        None
    } else {
        Some(target.to_lowercase())
    }
}
