//! Content extraction
//!
//! Turns a fetched HTML document into a [`PageRecord`]: the page title, the
//! main content region converted to Markdown with absolute links, and a
//! front matter header recording where and when the page was captured.

mod content;
mod markdown;

pub use content::{
    absolutize, extract_title, inner_html_with_absolute_links, resolve_base, select_main_content,
    CONTENT_SELECTORS,
};
pub use markdown::{convert_to_markdown, front_matter, normalize_markdown, DEFAULT_CODE_LANGUAGE};

use chrono::{DateTime, Utc};
use scraper::Html;
use thiserror::Error;
use url::Url;

/// Errors that can occur while extracting a page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Document is empty")]
    EmptyDocument,

    /// No content region and no `<body>`. The HTML parser always
    /// synthesizes a body unless the document is a `<frameset>`, so
    /// framesets are the only way to get here.
    #[error("Document has no body content")]
    MissingBody,

    #[error("Markdown conversion failed: {0}")]
    Conversion(#[from] std::io::Error),
}

/// An extracted page, ready to be written by the output pipeline
///
/// Created once per successfully extracted page and consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// URL the page was fetched from
    pub url: String,

    /// Document title, or the URL path when the page has none
    pub title: String,

    /// Markdown body with front matter
    pub content: String,

    /// When the page was captured
    pub captured_at: DateTime<Utc>,
}

/// Extracts a page record from raw HTML
///
/// # Errors
///
/// Returns an `ExtractError` if the document is empty, has no content region,
/// or cannot be converted. Callers log the error and skip the page.
///
/// # Example
///
/// ```
/// use golly::extract::extract;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/a/b").unwrap();
/// let html = r#"<html><head><title>B</title></head>
///     <body><main><a href="/docs/x">x</a></main></body></html>"#;
/// let record = extract(html, &url).unwrap();
/// assert_eq!(record.title, "B");
/// assert!(record.content.contains("https://example.com/docs/x"));
/// ```
pub fn extract(raw_html: &str, page_url: &Url) -> Result<PageRecord, ExtractError> {
    if raw_html.trim().is_empty() {
        return Err(ExtractError::EmptyDocument);
    }

    let document = Html::parse_document(raw_html);
    extract_document(&document, page_url, Utc::now())
}

/// Extracts a page record from an already parsed document
///
/// Split from [`extract`] so the crawler can parse a page once for both
/// extraction and link discovery.
///
/// # Errors
///
/// See [`extract`].
pub fn extract_document(
    document: &Html,
    page_url: &Url,
    captured_at: DateTime<Utc>,
) -> Result<PageRecord, ExtractError> {
    let title = extract_title(document).unwrap_or_else(|| page_url.path().to_string());
    let base = resolve_base(document, page_url);

    let region = select_main_content(document).ok_or(ExtractError::MissingBody)?;
    let fragment = inner_html_with_absolute_links(region, &base);

    let markdown = normalize_markdown(&convert_to_markdown(&fragment)?);

    let mut content = front_matter(&title, page_url.as_str(), captured_at);
    content.push_str(&markdown);

    Ok(PageRecord {
        url: page_url.to_string(),
        title,
        content,
        captured_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn page_url() -> Url {
        Url::parse("https://example.com/a/b").unwrap()
    }

    #[test]
    fn test_relative_link_persisted_absolute() {
        let html = r#"<html><head><title>Page B</title></head>
            <body><main><p>See <a href="/docs/x">the docs</a>.</p></main></body></html>"#;
        let record = extract(html, &page_url()).unwrap();

        assert!(record.content.contains("https://example.com/docs/x"));
        assert!(!record.content.contains("](/docs/x)"));
    }

    #[test]
    fn test_title_falls_back_to_path() {
        let html = "<html><body><p>No title here</p></body></html>";
        let record = extract(html, &page_url()).unwrap();
        assert_eq!(record.title, "/a/b");
        assert!(record.content.starts_with("---\ntitle: \"/a/b\"\n"));
    }

    #[test]
    fn test_front_matter_present() {
        let html = "<html><head><title>Intro</title></head>\
                    <body><article><p>Hello</p></article></body></html>";
        let doc = Html::parse_document(html);
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap();
        let record = extract_document(&doc, &page_url(), at).unwrap();

        assert_eq!(record.captured_at, at);
        assert_eq!(record.url, "https://example.com/a/b");
        assert!(record.content.starts_with(
            "---\ntitle: \"Intro\"\nsource_url: \"https://example.com/a/b\"\n\
             date_scraped: \"2024-03-04T05:06:07Z\"\n---\n\n"
        ));
        assert!(record.content.contains("Hello"));
    }

    #[test]
    fn test_main_content_excludes_navigation() {
        let html = r#"<html><body>
            <nav><a href="/nav">Navigation link</a></nav>
            <main><p>Main body text</p></main>
            <footer>Footer text</footer>
            </body></html>"#;
        let record = extract(html, &page_url()).unwrap();

        assert!(record.content.contains("Main body text"));
        assert!(!record.content.contains("Navigation link"));
        assert!(!record.content.contains("Footer text"));
    }

    #[test]
    fn test_empty_document_is_error() {
        assert!(matches!(
            extract("   \n ", &page_url()),
            Err(ExtractError::EmptyDocument)
        ));
    }

    #[test]
    fn test_frameset_document_has_no_body() {
        let html = r#"<html><head><title>Frames</title></head>
            <frameset cols="50%,50%"><frame src="left.html"><frame src="right.html"></frameset>
            </html>"#;
        assert!(matches!(
            extract(html, &page_url()),
            Err(ExtractError::MissingBody)
        ));
    }

    #[test]
    fn test_code_block_gets_default_language() {
        let html = "<html><body><main><pre><code>plain code</code></pre></main></body></html>";
        let record = extract(html, &page_url()).unwrap();
        assert!(record.content.contains("plain code"));
        assert!(!record.content.contains("```\nplain code"));
    }
}
