use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the domain (authority) from a site URL
///
/// The domain is the lower-cased host followed by the port when the URL
/// names one explicitly. This is the value robots.txt is requested from, so
/// `http://127.0.0.1:8080/page` yields `127.0.0.1:8080`.
///
/// # Examples
///
/// ```
/// use website_words::url::extract_domain;
///
/// assert_eq!(extract_domain("https://Example.COM/path").unwrap(), "example.com");
/// assert_eq!(extract_domain("http://localhost:8080/").unwrap(), "localhost:8080");
/// ```
pub fn extract_domain(url: &str) -> UrlResult<String> {
    let parsed = Url::parse(url.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| UrlError::MissingDomain(url.to_string()))?
        .to_lowercase();

    Ok(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_domain() {
        assert_eq!(extract_domain("https://example.com/").unwrap(), "example.com");
    }

    #[test]
    fn test_extract_subdomain() {
        assert_eq!(
            extract_domain("https://blog.example.com/post").unwrap(),
            "blog.example.com"
        );
    }

    #[test]
    fn test_extract_with_port() {
        assert_eq!(
            extract_domain("http://127.0.0.1:8080/").unwrap(),
            "127.0.0.1:8080"
        );
    }

    #[test]
    fn test_default_port_is_dropped() {
        assert_eq!(extract_domain("https://example.com:443/").unwrap(), "example.com");
    }

    #[test]
    fn test_extract_mixed_case() {
        assert_eq!(extract_domain("https://Example.COM/").unwrap(), "example.com");
    }

    #[test]
    fn test_extract_with_path_and_query() {
        assert_eq!(
            extract_domain("https://example.com/path/to/page?query=value").unwrap(),
            "example.com"
        );
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(extract_domain("  https://example.com/ ").unwrap(), "example.com");
    }

    #[test]
    fn test_relative_url_rejected() {
        assert!(matches!(extract_domain("/just/a/path"), Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_missing_host_rejected() {
        assert!(matches!(
            extract_domain("mailto:someone@example.com"),
            Err(UrlError::MissingDomain(_))
        ));
    }
}
