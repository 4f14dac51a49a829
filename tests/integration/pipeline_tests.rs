//! Integration tests for the run pipeline
//!
//! These tests use wiremock to serve robots.txt and pages and run the whole
//! pipeline into a temporary workspace.

use std::collections::HashSet;
use std::path::Path;
use tempfile::TempDir;
use website_words::config::{Config, CrawlerConfig, PathsConfig};
use website_words::crawler::run_pipeline;
use website_words::output::{ArtifactKind, RunStamp};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = "<html><body>Hello hello, World!</body></html>";

/// Creates a workspace whose input list holds the given websites
fn create_workspace(websites: &[String]) -> (TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        crawler: CrawlerConfig {
            robots_max_attempts: 1,
            robots_timeout_secs: 5,
            page_timeout_secs: 5,
            request_delay_ms: 0,
        },
        paths: PathsConfig {
            input: dir.path().join("data/input/url-list.csv"),
            output_dir: dir.path().join("data/output"),
            log_file: dir.path().join("logs/scraper.log"),
        },
        ..Config::default()
    };

    std::fs::create_dir_all(dir.path().join("data/input")).unwrap();
    let mut input = String::from("Website,Institution,Category,State,City\n");
    for (i, website) in websites.iter().enumerate() {
        input.push_str(&format!("{},Institution {},College,MN,Duluth\n", website, i));
    }
    std::fs::write(&config.paths.input, input).unwrap();

    (dir, config)
}

/// Output files of the given kind
fn artifacts(dir: &Path, kind: ArtifactKind) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| kind.stamp_of(&e.file_name().to_string_lossy()).is_some())
        .map(|e| e.path())
        .collect()
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[tokio::test]
async fn test_disallowed_site_excluded_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/private/area"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let allowed = format!("{}/", server.uri());
    let hidden = format!("{}/private/area", server.uri());
    let (_dir, config) = create_workspace(&[hidden.clone(), allowed.clone()]);

    let summary = run_pipeline(&config).await.unwrap();
    let output_dir = &config.paths.output_dir;

    // Word table: only the allowed site, {hello: 2, world: 1}
    let word_tables = artifacts(output_dir, ArtifactKind::WordTable);
    assert_eq!(word_tables.len(), 1);
    let words = read_rows(&word_tables[0]);
    assert_eq!(
        words,
        vec![
            vec![allowed.clone(), "hello".to_string(), "2".to_string()],
            vec![allowed.clone(), "world".to_string(), "1".to_string()],
        ]
    );

    // Site table: one row carrying the input metadata
    let site_tables = artifacts(output_dir, ArtifactKind::SiteTable);
    assert_eq!(site_tables.len(), 1);
    let sites = read_rows(&site_tables[0]);
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0][0], allowed);
    assert_eq!(sites[0][1], "Institution 1");

    // Summary JSON
    let summaries = artifacts(output_dir, ArtifactKind::Summary);
    assert_eq!(summaries.len(), 1);
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summaries[0]).unwrap()).unwrap();
    assert_eq!(json["log_metrics"]["DisallowedSkipCount"], 1);
    assert_eq!(json["log_metrics"]["UrlsAttempted"], 1);
    assert_eq!(json["word_metrics"]["TotalWords"], 2);
    assert_eq!(json["word_metrics"]["UniqueWords"], 2);
    assert_eq!(json["word_metrics"]["SumCounts"], 3);
    assert_eq!(summary.log_metrics.disallowed_skip_count, 1);

    // Every artifact carries the same stamp
    let stamps: HashSet<RunStamp> = std::fs::read_dir(output_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter_map(|e| RunStamp::split_file_name(&e.file_name().to_string_lossy()).map(|(s, _)| s))
        .collect();
    assert_eq!(stamps.len(), 1);
    assert_eq!(artifacts(output_dir, ArtifactKind::LogTable).len(), 1);

    let log = std::fs::read_to_string(&config.paths.log_file).unwrap();
    assert!(log.contains(&format!("Skipping {} due to disallowed path", hidden)));
}

#[tokio::test]
async fn test_missing_robots_still_crawls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/open"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><meta name=\"description\" content=\"Open page\"></head>\
             <body><a href=\"/a\">Open</a><img src=\"x.png\"></body></html>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/open", server.uri());
    let (_dir, config) = create_workspace(&[url.clone()]);

    let summary = run_pipeline(&config).await.unwrap();

    assert_eq!(summary.word_metrics.total_words, 1);
    assert_eq!(summary.site_metrics.sum_link_count, 1);
    assert_eq!(summary.site_metrics.sum_image_count, 1);
    assert_eq!(summary.log_metrics.disallowed_skip_count, 0);

    let log = std::fs::read_to_string(&config.paths.log_file).unwrap();
    assert!(log.contains("No robots.txt found for"));

    let site_tables = artifacts(&config.paths.output_dir, ArtifactKind::SiteTable);
    let sites = read_rows(&site_tables[0]);
    assert_eq!(sites[0][13], "Open page");
    assert_eq!(sites[0][12], "N/A");
}

#[tokio::test]
async fn test_failed_page_skipped_without_aborting() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/here"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>still here</p>"))
        .mount(&server)
        .await;

    let (_dir, config) = create_workspace(&[
        format!("{}/gone", server.uri()),
        format!("{}/here", server.uri()),
    ]);

    let summary = run_pipeline(&config).await.unwrap();

    assert_eq!(summary.log_metrics.urls_attempted, 2);
    assert!(summary.log_metrics.level_error_count >= 1);
    assert_eq!(summary.word_metrics.sum_counts, 2);

    let site_tables = artifacts(&config.paths.output_dir, ArtifactKind::SiteTable);
    assert_eq!(read_rows(&site_tables[0]).len(), 1);
}
