//! Word and site table writers
//!
//! Both tables are written once per run under the writer's run stamp and
//! then sorted in place, so their row order never depends on fetch order or
//! hash map iteration.

use crate::crawler::{CrawlResults, SiteResult};
use crate::events::{Category, EventSink};
use crate::output::stamp::RunStamp;
use crate::output::traits::{ArtifactKind, OutputError, OutputResult};
use csv::{StringRecord, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Header of the word table
pub const WORD_TABLE_HEADERS: [&str; 3] = ["Website", "Word", "Count"];

/// Header of the site table
pub const SITE_TABLE_HEADERS: [&str; 14] = [
    "Website",
    "Institution",
    "Category",
    "State",
    "City",
    "ImageCount",
    "LinkCount",
    "FormCount",
    "StylesheetCount",
    "ScriptCount",
    "CertificateInfo",
    "HostInfo",
    "Title",
    "Description",
];

/// Sort keys of the word table
pub const WORD_TABLE_SORT_KEYS: [&str; 2] = ["Website", "Word"];

/// Sort key of the site table
pub const SITE_TABLE_SORT_KEYS: [&str; 1] = ["Website"];

/// One row of the word table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRow {
    #[serde(rename = "Website")]
    pub website: String,
    #[serde(rename = "Word")]
    pub word: String,
    #[serde(rename = "Count")]
    pub count: u64,
}

/// One row of the site table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SiteRow {
    pub website: String,
    pub institution: String,
    pub category: String,
    pub state: String,
    pub city: String,
    pub image_count: u64,
    pub link_count: u64,
    pub form_count: u64,
    pub stylesheet_count: u64,
    pub script_count: u64,
    pub certificate_info: String,
    pub host_info: String,
    pub title: String,
    pub description: String,
}

impl From<&SiteResult> for SiteRow {
    fn from(result: &SiteResult) -> Self {
        let site = &result.site;
        let metrics = &result.metrics;
        Self {
            website: site.website.clone(),
            institution: site.institution.clone(),
            category: site.category.clone(),
            state: site.state.clone(),
            city: site.city.clone(),
            image_count: metrics.images,
            link_count: metrics.links,
            form_count: metrics.forms,
            stylesheet_count: metrics.stylesheets,
            script_count: metrics.scripts,
            certificate_info: metrics.certificate.clone(),
            host_info: metrics.host.clone(),
            title: metrics.title.clone(),
            description: metrics.description.clone(),
        }
    }
}

/// Paths of the tables written by [`OutputWriter::write_tables`]
///
/// A table that failed to write is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TablePaths {
    pub word_table: Option<PathBuf>,
    pub site_table: Option<PathBuf>,
}

/// Writes the word and site tables for one run
pub struct OutputWriter {
    dir: PathBuf,
    stamp: RunStamp,
    sink: Arc<dyn EventSink>,
}

impl OutputWriter {
    /// # Arguments
    ///
    /// * `dir` - Output directory (must exist)
    /// * `stamp` - Run stamp applied to every table this writer produces
    /// * `sink` - Run event sink
    pub fn new(dir: impl Into<PathBuf>, stamp: RunStamp, sink: Arc<dyn EventSink>) -> Self {
        Self {
            dir: dir.into(),
            stamp,
            sink,
        }
    }

    /// Writes `{stamp}-word-data.csv`, one row per (site, word)
    pub fn write_word_table(&self, results: &CrawlResults) -> OutputResult<PathBuf> {
        let path = ArtifactKind::WordTable.path_in(&self.dir, &self.stamp);
        let mut writer = WriterBuilder::new().has_headers(false).from_path(&path)?;
        writer.write_record(WORD_TABLE_HEADERS)?;

        for result in results.iter() {
            for (word, count) in &result.words {
                writer.serialize(WordRow {
                    website: result.site.website.clone(),
                    word: word.clone(),
                    count: *count,
                })?;
            }
        }

        writer.flush()?;
        Ok(path)
    }

    /// Writes `{stamp}-site-data.csv`, one row per site
    pub fn write_site_table(&self, results: &CrawlResults) -> OutputResult<PathBuf> {
        let path = ArtifactKind::SiteTable.path_in(&self.dir, &self.stamp);
        let mut writer = WriterBuilder::new().has_headers(false).from_path(&path)?;
        writer.write_record(SITE_TABLE_HEADERS)?;

        for result in results.iter() {
            writer.serialize(SiteRow::from(result))?;
        }

        writer.flush()?;
        Ok(path)
    }

    /// Writes and sorts both tables
    ///
    /// Failures are logged; the corresponding path is left out so later
    /// stages can degrade gracefully.
    pub fn write_tables(&self, results: &CrawlResults) -> TablePaths {
        TablePaths {
            word_table: self.write_sorted(
                "word-data",
                || self.write_word_table(results),
                &WORD_TABLE_SORT_KEYS,
            ),
            site_table: self.write_sorted(
                "site-data",
                || self.write_site_table(results),
                &SITE_TABLE_SORT_KEYS,
            ),
        }
    }

    fn write_sorted(
        &self,
        label: &str,
        write: impl FnOnce() -> OutputResult<PathBuf>,
        sort_keys: &[&str],
    ) -> Option<PathBuf> {
        let path = match write() {
            Ok(path) => path,
            Err(e) => {
                self.sink.error(
                    Category::Utility,
                    &format!("Error saving {} in `{}`: {}", label, self.dir.display(), e),
                );
                return None;
            }
        };
        self.sink.info(
            Category::Utility,
            &format!("{} saved to `{}`", capitalize(label), path.display()),
        );

        match sort_table_file(&path, sort_keys) {
            Ok(()) => self.sink.info(
                Category::Utility,
                &format!("Sorted {} saved to `{}`", label, path.display()),
            ),
            Err(e) => self.sink.error(
                Category::Utility,
                &format!("Error sorting {} in `{}`: {}", label, path.display(), e),
            ),
        }

        Some(path)
    }
}

/// Sorts a CSV table in place by the given columns
///
/// Rows are compared column by column as plain strings (case-sensitive,
/// byte order). The sort is stable, so rows with equal keys keep their
/// relative order and sorting a sorted table leaves it unchanged.
pub fn sort_table_file(path: &Path, key_columns: &[&str]) -> OutputResult<()> {
    let (headers, mut records) = {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        (headers, records)
    };

    let key_indices = key_columns
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|h| h == *column)
                .ok_or_else(|| OutputError::MissingColumn {
                    column: column.to_string(),
                    path: path.display().to_string(),
                })
        })
        .collect::<OutputResult<Vec<_>>>()?;

    records.sort_by(|a, b| compare_keys(a, b, &key_indices));

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&headers)?;
    for record in &records {
        writer.write_record(record)?;
    }
    writer.flush()?;

    Ok(())
}

fn compare_keys(a: &StringRecord, b: &StringRecord, key_indices: &[usize]) -> Ordering {
    key_indices
        .iter()
        .map(|&i| a.get(i).unwrap_or("").cmp(b.get(i).unwrap_or("")))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{PageMetrics, WordHistogram};
    use crate::events::MemoryEventSink;
    use crate::site::SiteRecord;
    use tempfile::tempdir;

    fn result(website: &str, words: &[(&str, u64)]) -> SiteResult {
        SiteResult {
            site: SiteRecord::new(website, "Inst", "Cat", "ST", "City"),
            words: words
                .iter()
                .map(|(w, c)| (w.to_string(), *c))
                .collect::<WordHistogram>(),
            metrics: PageMetrics {
                images: 2,
                links: 3,
                ..PageMetrics::default()
            },
        }
    }

    fn writer(dir: &Path) -> (OutputWriter, Arc<MemoryEventSink>) {
        let sink = Arc::new(MemoryEventSink::new());
        let stamp = RunStamp::parse("20241017-0930").unwrap();
        (OutputWriter::new(dir, stamp, sink.clone()), sink)
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_word_table_sorted_by_site_then_word() {
        let dir = tempdir().unwrap();
        let (writer, _sink) = writer(dir.path());

        let mut results = CrawlResults::new();
        results.insert(result("https://b.example.com/", &[("zeta", 1), ("alpha", 4)]));
        results.insert(result("https://a.example.com/", &[("beta", 2), ("Beta", 1), ("", 3)]));

        let paths = writer.write_tables(&results);
        let word_path = paths.word_table.unwrap();
        assert_eq!(
            word_path.file_name().unwrap().to_str().unwrap(),
            "20241017-0930-word-data.csv"
        );

        let rows = read_rows(&word_path);
        let keys: Vec<(&str, &str)> = rows.iter().map(|r| (r[0].as_str(), r[1].as_str())).collect();
        assert_eq!(
            keys,
            vec![
                ("https://a.example.com/", ""),
                ("https://a.example.com/", "Beta"),
                ("https://a.example.com/", "beta"),
                ("https://b.example.com/", "alpha"),
                ("https://b.example.com/", "zeta"),
            ]
        );
    }

    #[test]
    fn test_word_rows_match_histogram() {
        let dir = tempdir().unwrap();
        let (writer, _sink) = writer(dir.path());

        let mut results = CrawlResults::new();
        results.insert(result("https://a.example.com/", &[("hello", 2), ("world", 1)]));

        let path = writer.write_word_table(&results).unwrap();
        let rows = read_rows(&path);

        assert_eq!(rows.len(), 2);
        let total: u64 = rows.iter().map(|r| r[2].parse::<u64>().unwrap()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_site_table_columns_and_order() {
        let dir = tempdir().unwrap();
        let (writer, _sink) = writer(dir.path());

        let mut results = CrawlResults::new();
        results.insert(result("https://z.example.com/", &[]));
        results.insert(result("https://m.example.com/", &[]));

        let path = writer.write_tables(&results).site_table.unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, SITE_TABLE_HEADERS.to_vec());

        let rows = read_rows(&path);
        assert_eq!(rows[0][0], "https://m.example.com/");
        assert_eq!(rows[1][0], "https://z.example.com/");
        assert_eq!(rows[0][5], "2");
        assert_eq!(rows[0][6], "3");
        assert_eq!(rows[0][10], "N/A");
        assert_eq!(rows[0][13], "N/A");
    }

    #[test]
    fn test_empty_results_still_write_headers() {
        let dir = tempdir().unwrap();
        let (writer, sink) = writer(dir.path());

        let paths = writer.write_tables(&CrawlResults::new());

        let word = std::fs::read_to_string(paths.word_table.unwrap()).unwrap();
        assert_eq!(word.trim_end(), "Website,Word,Count");
        assert!(paths.site_table.is_some());
        assert!(sink.contains("Word-data saved to"));
        assert!(sink.contains("Sorted site-data saved to"));
    }

    #[test]
    fn test_write_failure_is_logged() {
        let dir = tempdir().unwrap();
        let (writer, sink) = writer(&dir.path().join("missing"));

        let paths = writer.write_tables(&CrawlResults::new());

        assert_eq!(paths, TablePaths::default());
        assert!(sink.contains("Error saving word-data"));
    }

    #[test]
    fn test_sort_is_stable_and_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "Website,Word,Count\nb,x,1\na,y,2\nb,x,3\na,b,4\n").unwrap();

        sort_table_file(&path, &WORD_TABLE_SORT_KEYS).unwrap();
        let once = std::fs::read_to_string(&path).unwrap();
        assert_eq!(once, "Website,Word,Count\na,b,4\na,y,2\nb,x,1\nb,x,3\n");

        sort_table_file(&path, &WORD_TABLE_SORT_KEYS).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), once);
    }

    #[test]
    fn test_sort_missing_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "A,B\n1,2\n").unwrap();

        let result = sort_table_file(&path, &["Website"]);
        assert!(matches!(result, Err(OutputError::MissingColumn { .. })));
    }

    #[test]
    fn test_sort_preserves_quoted_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "Website,Title\nb,\"Hello, \"\"World\"\"\"\na,plain\n").unwrap();

        sort_table_file(&path, &SITE_TABLE_SORT_KEYS).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows[0], vec!["a".to_string(), "plain".to_string()]);
        assert_eq!(rows[1][1], "Hello, \"World\"");
    }
}
