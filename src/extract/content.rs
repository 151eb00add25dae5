//! Title lookup, main-content selection and link-absolutizing serialization

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::borrow::Cow;
use url::Url;

/// Selectors tried in order when looking for the main content region
pub const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role=main]",
    "#content",
    ".main-content",
    ".content",
    ".documentation",
];

/// Elements dropped from the content before conversion
const DROPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Returns the URL relative links in `document` resolve against
///
/// This is the page URL unless the document declares a `<base href>`.
pub fn resolve_base(document: &Html, page_url: &Url) -> Url {
    let Ok(selector) = Selector::parse("base[href]") else {
        return page_url.clone();
    };

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone())
}

/// Returns the first `<title>` with non-empty text, whitespace collapsed
pub fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .find(|title| !title.is_empty())
}

/// Picks the element holding the page's main content
///
/// Tries [`CONTENT_SELECTORS`] in priority order and returns the first match
/// that contains non-whitespace text. Falls back to `<body>`.
pub fn select_main_content(document: &Html) -> Option<ElementRef<'_>> {
    for raw in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };

        let found = document.select(&selector).find(has_text);
        if let Some(element) = found {
            tracing::trace!("Main content matched selector {}", raw);
            return Some(element);
        }
    }

    let body = Selector::parse("body").ok()?;
    document.select(&body).next()
}

/// Serializes the children of `element` back to HTML
///
/// Every `<a href>` is written with its absolute form resolved against
/// `base`; hrefs that cannot be resolved are written unchanged. Script-like
/// elements are dropped along with their contents.
pub fn inner_html_with_absolute_links(element: ElementRef<'_>, base: &Url) -> String {
    let mut out = String::new();
    write_children(element, base, &mut out);
    out
}

fn write_children(element: ElementRef<'_>, base: &Url, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&escape_text(&text.text)),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    write_element(child_element, base, out);
                }
            }
            _ => {}
        }
    }
}

fn write_element(element: ElementRef<'_>, base: &Url, out: &mut String) {
    let value = element.value();
    let name = value.name();

    if DROPPED_ELEMENTS.contains(&name) {
        return;
    }

    out.push('<');
    out.push_str(name);
    for (attr, raw_value) in value.attrs() {
        let attr_value: Cow<'_, str> = if name == "a" && attr == "href" {
            absolutize(raw_value, base)
        } else {
            Cow::Borrowed(raw_value)
        };
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        out.push_str(&escape_attr(&attr_value));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    write_children(element, base, out);

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Resolves an href against `base`, keeping it as written on failure
pub fn absolutize<'a>(href: &'a str, base: &Url) -> Cow<'a, str> {
    match base.join(href.trim()) {
        Ok(absolute) => Cow::Owned(absolute.to_string()),
        Err(_) => Cow::Borrowed(href),
    }
}

fn has_text(element: &ElementRef<'_>) -> bool {
    element.text().any(|t| !t.trim().is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    )
}

fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '"']) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(value.replace('&', "&amp;").replace('"', "&quot;"))
}
