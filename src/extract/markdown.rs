//! HTML to Markdown conversion and cleanup
//!
//! Conversion itself is delegated to `htmd`. This module owns the cleanup
//! pass and the front matter header.

use chrono::{DateTime, SecondsFormat, Utc};

/// Language tag given to fenced code blocks that lack one
pub const DEFAULT_CODE_LANGUAGE: &str = "text";

/// Converts an HTML fragment to Markdown
///
/// # Errors
///
/// Returns the converter's I/O error if the fragment cannot be processed.
pub fn convert_to_markdown(html: &str) -> Result<String, std::io::Error> {
    htmd::convert(html)
}

/// Cleans up converted Markdown
///
/// - Runs of blank lines collapse to a single blank line, i.e. three or more
///   consecutive newlines become two. Whitespace-only lines count as blank.
/// - Opening code fences without a language tag get
///   [`DEFAULT_CODE_LANGUAGE`]. Closing fences are left alone.
/// - Content inside fenced code blocks is never altered.
/// - Leading and trailing blank lines are removed; output ends with one
///   newline.
///
/// # Examples
///
/// ```
/// use golly::extract::normalize_markdown;
///
/// let md = normalize_markdown("a\n\n\n\n\nb\n```\nx\n```\n");
/// assert_eq!(md, "a\n\nb\n```text\nx\n```\n");
/// ```
pub fn normalize_markdown(markdown: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut open_fence: Option<Fence> = None;
    let mut blank_run = 0usize;

    for line in markdown.lines() {
        if let Some(fence) = &open_fence {
            if fence.is_closed_by(line) {
                open_fence = None;
            }
            lines.push(line.to_string());
            continue;
        }

        if let Some(fence) = Fence::parse_opening(line) {
            blank_run = 0;
            if fence.has_info {
                lines.push(line.to_string());
            } else {
                lines.push(format!("{}{}", line.trim_end(), DEFAULT_CODE_LANGUAGE));
            }
            open_fence = Some(fence);
            continue;
        }

        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run == 1 {
                lines.push(String::new());
            }
        } else {
            blank_run = 0;
            lines.push(line.to_string());
        }
    }

    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);

    match lines.get(start..end) {
        Some(body) if !body.is_empty() => {
            let mut out = body.join("\n");
            out.push('\n');
            out
        }
        _ => String::new(),
    }
}

/// Builds the front matter block prepended to every saved page
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use golly::extract::front_matter;
///
/// let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
/// let header = front_matter("Intro", "https://example.com/", at);
/// assert!(header.starts_with("---\ntitle: \"Intro\"\n"));
/// assert!(header.contains("date_scraped: \"2024-05-01T12:00:00Z\"\n"));
/// ```
pub fn front_matter(title: &str, source_url: &str, captured_at: DateTime<Utc>) -> String {
    format!(
        "---\ntitle: \"{}\"\nsource_url: \"{}\"\ndate_scraped: \"{}\"\n---\n\n",
        escape_quoted(title),
        escape_quoted(source_url),
        captured_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// An open code fence: the marker character and how many times it repeats
#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
    has_info: bool,
}

impl Fence {
    fn parse_opening(line: &str) -> Option<Fence> {
        let trimmed = line.trim_start();
        // More than three spaces of indentation is an indented code block
        if line.len() - trimmed.len() > 3 {
            return None;
        }

        let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = trimmed.chars().take_while(|c| *c == marker).count();
        if len < 3 {
            return None;
        }

        let info = trimmed[len..].trim();
        // Backtick fences may not carry backticks in their info string
        if marker == '`' && info.contains('`') {
            return None;
        }

        Some(Fence {
            marker,
            len,
            has_info: !info.is_empty(),
        })
    }

    fn is_closed_by(&self, line: &str) -> bool {
        let trimmed = line.trim();
        let run = trimmed.chars().take_while(|c| *c == self.marker).count();
        run >= self.len && run == trimmed.chars().count()
    }
}
