//! Site list input
//!
//! Sites come from a CSV file with the columns
//! `Website, Category, State, City, Institution` (any order, extra columns
//! ignored). The metadata columns are never inspected; they are attached
//! unchanged to every record derived from the site.

use crate::events::{Category, EventSink};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One crawl target plus caller-supplied metadata
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SiteRecord {
    #[serde(rename = "Website")]
    pub website: String,

    #[serde(rename = "Institution")]
    pub institution: String,

    #[serde(rename = "Category")]
    pub category: String,

    #[serde(rename = "State")]
    pub state: String,

    #[serde(rename = "City")]
    pub city: String,
}

impl SiteRecord {
    pub fn new(
        website: impl Into<String>,
        institution: impl Into<String>,
        category: impl Into<String>,
        state: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            website: website.into(),
            institution: institution.into(),
            category: category.into(),
            state: state.into(),
            city: city.into(),
        }
    }
}

/// Reads the site list
///
/// Rows missing a required column are logged and skipped. A Website listed
/// more than once is crawled once: it keeps its first position and the
/// metadata of its last row. A file that cannot
/// be opened is logged and yields an empty list; the run then proceeds with
/// nothing to crawl.
pub fn load_sites(path: &Path, sink: &dyn EventSink) -> Vec<SiteRecord> {
    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(e) => {
            sink.error(
                Category::Utility,
                &format!("Error loading URLs from `{}`: {}", path.display(), e),
            );
            return Vec::new();
        }
    };

    let mut sites: Vec<SiteRecord> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (index, row) in reader.deserialize::<SiteRecord>().enumerate() {
        match row {
            Ok(site) => match positions.get(&site.website) {
                Some(&pos) => {
                    sink.warning(
                        Category::Utility,
                        &format!(
                            "Duplicate website {} on row {}, keeping the later row",
                            site.website,
                            index + 1
                        ),
                    );
                    sites[pos] = site;
                }
                None => {
                    positions.insert(site.website.clone(), sites.len());
                    sites.push(site);
                }
            },
            Err(e) => sink.warning(
                Category::Utility,
                &format!("Skipping row {} of `{}`: {}", index + 1, path.display(), e),
            ),
        }
    }

    sink.info(
        Category::Utility,
        &format!("URLs loaded from `{}` ({} sites)", path.display(), sites.len()),
    );
    sites
}
