//! HTML parser for word counts and structural metrics
//!
//! This module turns a fetched page into the two records the crawler reports:
//! - A word histogram built from the page text
//! - Counts of the markup elements of interest plus title/description

use scraper::{Html, Node, Selector};
use std::collections::HashMap;

/// Placeholder for values that are not collected or not present
pub const NOT_AVAILABLE: &str = "N/A";

/// Characters stripped from both ends of every token
const STRIPPED: [char; 4] = ['.', ',', '!', '?'];

/// Elements whose text content is never shown on the page
const HIDDEN_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Normalized token → occurrence count for one page
pub type WordHistogram = HashMap<String, u64>;

/// Structural metrics for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetrics {
    /// Number of `<img>` elements
    pub images: u64,

    /// Number of `<a>` elements
    pub links: u64,

    /// Number of `<form>` elements
    pub forms: u64,

    /// Number of `<link>` elements with a `stylesheet` relation
    pub stylesheets: u64,

    /// Number of `<script>` elements with a `src` attribute
    pub scripts: u64,

    /// Certificate details (never collected)
    pub certificate: String,

    /// Host details (never collected)
    pub host: String,

    /// `<meta name="title">` content
    pub title: String,

    /// `<meta name="description">` content
    pub description: String,
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self {
            images: 0,
            links: 0,
            forms: 0,
            stylesheets: 0,
            scripts: 0,
            certificate: NOT_AVAILABLE.to_string(),
            host: NOT_AVAILABLE.to_string(),
            title: NOT_AVAILABLE.to_string(),
            description: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Everything extracted from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageExtract {
    pub words: WordHistogram,
    pub metrics: PageMetrics,
}

/// Parses HTML content into a word histogram and structural metrics
///
/// # Word Extraction Rules
///
/// - Text nodes are joined with single spaces (text inside `<script>` and
///   `<style>` is skipped) and split on whitespace
/// - Each token is lower-cased and `.`, `,`, `!`, `?` are stripped from both ends
/// - No other punctuation handling and no stop-word removal
/// - A token made only of stripped characters becomes the empty word `""`,
///   which is counted like any other word
///
/// # Example
///
/// ```
/// use website_words::crawler::parse_html;
///
/// let page = parse_html("<html><body>Hello hello, World!</body></html>");
/// assert_eq!(page.words["hello"], 2);
/// assert_eq!(page.words["world"], 1);
/// ```
pub fn parse_html(html: &str) -> PageExtract {
    let document = Html::parse_document(html);

    PageExtract {
        words: count_words(&document),
        metrics: extract_metrics(&document),
    }
}

/// Normalizes a raw whitespace-delimited token
pub fn normalize_token(raw: &str) -> String {
    raw.to_lowercase().trim_matches(&STRIPPED[..]).to_string()
}

/// Builds the word histogram from the document's text nodes
fn count_words(document: &Html) -> WordHistogram {
    let mut words = WordHistogram::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|e| e.name()))
            .is_some_and(|name| HIDDEN_TEXT_ELEMENTS.contains(&name));
        if hidden {
            continue;
        }

        for raw in text.split_whitespace() {
            *words.entry(normalize_token(raw)).or_insert(0) += 1;
        }
    }

    words
}

/// Counts the structural elements of interest and reads the meta fields
fn extract_metrics(document: &Html) -> PageMetrics {
    PageMetrics {
        images: count_matches(document, "img"),
        links: count_matches(document, "a"),
        forms: count_matches(document, "form"),
        stylesheets: count_stylesheets(document),
        scripts: count_matches(document, "script[src]"),
        title: meta_content(document, "title").unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        description: meta_content(document, "description")
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ..PageMetrics::default()
    }
}

fn count_matches(document: &Html, css: &str) -> u64 {
    Selector::parse(css)
        .map(|selector| document.select(&selector).count() as u64)
        .unwrap_or(0)
}

/// Counts `<link>` elements whose `rel` token list contains `stylesheet`
fn count_stylesheets(document: &Html) -> u64 {
    let Ok(selector) = Selector::parse("link[rel]") else {
        return 0;
    };

    document
        .select(&selector)
        .filter(|element| {
            element.value().attr("rel").is_some_and(|rel| {
                rel.split_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("stylesheet"))
            })
        })
        .count() as u64
}

/// Reads the `content` of the first `<meta name="...">` with the given name
fn meta_content(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse("meta[name]").ok()?;

    document
        .select(&selector)
        .find(|element| {
            element
                .value()
                .attr("name")
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
        })
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}
