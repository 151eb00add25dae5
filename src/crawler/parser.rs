//! Link discovery for fetched HTML pages
//!
//! Finds every `<a href>` in a document, resolves it to an absolute URL and
//! normalizes it. Filtering and deduplication across pages happen later in
//! the coordinator.

use crate::extract::resolve_base;
use crate::url::normalize_url;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts all followable links from a parsed document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document, resolved against the page URL
///   (or the document's `<base href>`)
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:`, `data:` references
/// - Fragment-only references (same page anchors)
/// - References that fail to resolve, or resolve to a non-HTTP(S) URL
///
/// Fragments are stripped and duplicates within the page removed; order of
/// first appearance is kept.
///
/// # Example
///
/// ```
/// use golly::crawler::discover_links;
/// use scraper::Html;
/// use url::Url;
///
/// let html = Html::parse_document(r#"<a href="/page">Link</a><a href="/page#top">Again</a>"#);
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// let links = discover_links(&html, &base);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/page");
/// ```
pub fn discover_links(document: &Html, page_url: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let base = resolve_base(document, page_url);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        // Skip if it has the download attribute
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(absolute) = resolve_link(href, &base) {
            if seen.insert(absolute.as_str().to_string()) {
                links.push(absolute);
            }
        }
    }

    links
}

/// Resolves a link href to a normalized absolute URL
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute = base.join(href).ok()?;
    normalize_url(absolute.as_str()).ok()
}
