use crate::UrlError;
use url::Url;

/// Extracts the lowercase host from a URL, without port
///
/// # Examples
///
/// ```
/// use url::Url;
/// use golly::url::extract_host;
///
/// let url = Url::parse("https://Docs.Example.COM:8443/path").unwrap();
/// assert_eq!(extract_host(&url), Some("docs.example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Builds the include pattern used when none is configured
///
/// The pattern is anchored to the scheme and host of the start URL and
/// accepts both http and https. The host is regex-escaped, so dots only
/// match dots.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use golly::url::default_include_pattern;
///
/// let start = Url::parse("https://docs.example.com/guide/").unwrap();
/// assert_eq!(
///     default_include_pattern(&start).unwrap(),
///     r"^https?://docs\.example\.com"
/// );
/// ```
pub fn default_include_pattern(start_url: &Url) -> Result<String, UrlError> {
    let host = extract_host(start_url).ok_or(UrlError::MissingHost)?;
    Ok(format!("^https?://{}", regex::escape(&host)))
}
