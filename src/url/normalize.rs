use crate::UrlError;
use url::Url;

/// Normalizes a URL into the form used as a Visited Set key and fetched
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not http or https
/// 3. Reject URLs without a host
/// 4. Lowercase the host and resolve dot segments (done by the parser)
/// 5. Remove the fragment (everything after #)
/// 6. Remove an empty query string (trailing ?)
///
/// Trailing slashes and query parameters are kept: documentation sites
/// commonly serve different content for `/guide` and `/guide/`.
///
/// # Examples
///
/// ```
/// use golly::url::normalize_url;
///
/// let url = normalize_url("https://Example.COM/a/../docs#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_host() {
        let url = normalize_url("https://EXAMPLE.com/Docs").unwrap();
        assert_eq!(url.as_str(), "https://example.com/Docs");
    }

    #[test]
    fn test_removes_fragment() {
        let url = normalize_url("https://example.com/page#section").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_removes_empty_query() {
        let url = normalize_url("https://example.com/page?").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keeps_query_and_trailing_slash() {
        let url = normalize_url("https://example.com/guide/?v=2").unwrap();
        assert_eq!(url.as_str(), "https://example.com/guide/?v=2");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let url = normalize_url("https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_resolves_dot_segments() {
        let url = normalize_url("https://example.com/a/./b/../c").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a/c");
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        assert!(matches!(
            normalize_url("ftp://example.com/file"),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(normalize_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_rejects_relative() {
        assert!(matches!(normalize_url("/docs/x"), Err(UrlError::Parse(_))));
    }
}
