//! File naming for saved pages

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};

/// Maximum length of a sanitized file stem, in characters
pub const MAX_FILENAME_CHARS: usize = 100;

/// Stem used when a title sanitizes to nothing
pub const DEFAULT_FILENAME: &str = "page";

/// Extension of saved pages
pub const PAGE_EXTENSION: &str = "md";

/// Upper bound on collision suffixes tried before giving up
const MAX_COLLISION_SUFFIX: u32 = 100_000;

/// Longest file name most filesystems accept, in bytes
const MAX_FILENAME_BYTES: usize = 255;

/// Bytes a stem may use so that `<stem>_<N>.md` still fits
/// [`MAX_FILENAME_BYTES`] for every collision suffix
pub const MAX_STEM_BYTES: usize = MAX_FILENAME_BYTES
    - "_100000".len()
    - ".".len()
    - PAGE_EXTENSION.len();

/// Turns a page title into a safe file stem
///
/// Runs of characters that are illegal in file names (`<>:"/\|?*` and
/// control characters) become a single `_`. The result is trimmed and
/// truncated to [`MAX_FILENAME_CHARS`] characters, then further to
/// [`MAX_STEM_BYTES`] bytes on a character boundary. An empty result becomes
/// [`DEFAULT_FILENAME`].
///
/// # Examples
///
/// ```
/// use golly::output::sanitize_filename;
///
/// assert_eq!(sanitize_filename("  A/B: C?  "), "A_B_ C_");
/// assert_eq!(sanitize_filename("???"), "_");
/// assert_eq!(sanitize_filename("   "), "page");
/// ```
pub fn sanitize_filename(title: &str) -> String {
    let mut sanitized = String::with_capacity(title.len());
    let mut in_illegal_run = false;

    for c in title.chars() {
        if is_illegal(c) {
            if !in_illegal_run {
                sanitized.push('_');
                in_illegal_run = true;
            }
        } else {
            sanitized.push(c);
            in_illegal_run = false;
        }
    }

    let truncated: String = sanitized.trim().chars().take(MAX_FILENAME_CHARS).collect();
    let truncated = truncate_to_bytes(&truncated, MAX_STEM_BYTES).trim_end();

    if truncated.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        truncated.to_string()
    }
}

fn truncate_to_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn is_illegal(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control()
}

/// Creates a new file named `<stem>.<ext>` in `dir`, or `<stem>_N.<ext>` with
/// the smallest `N >= 1` that is free
///
/// Files are opened with `create_new`, so an existing file is never
/// overwritten. Suffix probing is still only meaningful with a single writer
/// to `dir`.
///
/// # Errors
///
/// Returns the I/O error from opening the file, or an error if no free name
/// was found.
pub async fn create_unique_file(dir: &Path, stem: &str, ext: &str) -> io::Result<(PathBuf, File)> {
    let mut candidate = dir.join(format!("{}.{}", stem, ext));
    let mut counter = 1u32;

    loop {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                if counter > MAX_COLLISION_SUFFIX {
                    return Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("no free file name for '{}' in {}", stem, dir.display()),
                    ));
                }
                candidate = dir.join(format!("{}_{}.{}", stem, counter, ext));
                counter += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
