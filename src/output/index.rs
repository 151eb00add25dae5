//! The `index.md` artifact listing every saved page

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// File name of the index inside the output directory
pub const INDEX_FILENAME: &str = "index.md";

/// Header written at the top of a fresh index
pub const INDEX_HEADER: &str = "# Index of Scraped Pages\n\n";

/// One line of the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Title shown as link text
    pub title: String,

    /// Path of the saved file relative to the output directory
    pub relative_path: String,

    /// URL the page was fetched from
    pub source_url: String,
}

impl IndexEntry {
    /// Formats the entry as a Markdown list item
    ///
    /// The relative path is percent-escaped; brackets in the title are
    /// backslash-escaped so the link text stays intact.
    ///
    /// # Examples
    ///
    /// ```
    /// use golly::output::IndexEntry;
    ///
    /// let entry = IndexEntry {
    ///     title: "Getting Started".to_string(),
    ///     relative_path: "Getting Started.md".to_string(),
    ///     source_url: "https://example.com/start".to_string(),
    /// };
    /// assert_eq!(
    ///     entry.to_markdown_line(),
    ///     "- [Getting Started](Getting%20Started.md) - [Source](https://example.com/start)\n"
    /// );
    /// ```
    pub fn to_markdown_line(&self) -> String {
        format!(
            "- [{}]({}) - [Source]({})\n",
            escape_link_text(&self.title),
            urlencoding::encode(&self.relative_path),
            self.source_url
        )
    }
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

/// Appends entries to `index.md` in completion order
#[derive(Debug)]
pub struct IndexWriter {
    path: PathBuf,
    file: File,
    entries: u64,
}

impl IndexWriter {
    /// Creates (or truncates) `index.md` in `output_dir` and writes the header
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be created or written.
    pub async fn create(output_dir: &Path) -> io::Result<Self> {
        let path = output_dir.join(INDEX_FILENAME);
        let mut file = File::create(&path).await?;
        file.write_all(INDEX_HEADER.as_bytes()).await?;
        file.flush().await?;

        Ok(Self {
            path,
            file,
            entries: 0,
        })
    }

    /// Appends one entry and flushes it to disk
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the write fails.
    pub async fn append(&mut self, entry: &IndexEntry) -> io::Result<()> {
        self.file
            .write_all(entry.to_markdown_line().as_bytes())
            .await?;
        self.file.flush().await?;
        self.entries += 1;
        Ok(())
    }

    /// Path of the index file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries appended so far
    pub fn entries(&self) -> u64 {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(title: &str, path: &str) -> IndexEntry {
        IndexEntry {
            title: title.to_string(),
            relative_path: path.to_string(),
            source_url: "https://example.com/page".to_string(),
        }
    }

    #[test]
    fn test_line_escapes_path() {
        let line = entry("A & B", "A & B_1.md").to_markdown_line();
        assert_eq!(
            line,
            "- [A & B](A%20%26%20B_1.md) - [Source](https://example.com/page)\n"
        );
    }

    #[test]
    fn test_line_escapes_brackets_in_title() {
        let line = entry("[beta] Docs", "_beta_ Docs.md").to_markdown_line();
        assert!(line.starts_with("- [\\[beta\\] Docs]("));
    }

    #[tokio::test]
    async fn test_create_writes_header() {
        let dir = TempDir::new().unwrap();
        let index = IndexWriter::create(dir.path()).await.unwrap();

        assert_eq!(index.path(), dir.path().join(INDEX_FILENAME));
        assert_eq!(index.entries(), 0);
        let content = std::fs::read_to_string(index.path()).unwrap();
        assert_eq!(content, INDEX_HEADER);
    }

    #[tokio::test]
    async fn test_append_in_order() {
        let dir = TempDir::new().unwrap();
        let mut index = IndexWriter::create(dir.path()).await.unwrap();

        index.append(&entry("Second", "Second.md")).await.unwrap();
        index.append(&entry("First", "First.md")).await.unwrap();
        assert_eq!(index.entries(), 2);

        let content = std::fs::read_to_string(index.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "# Index of Scraped Pages");
        assert!(lines[2].starts_with("- [Second](Second.md)"));
        assert!(lines[3].starts_with("- [First](First.md)"));
    }

    #[tokio::test]
    async fn test_create_in_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        assert!(IndexWriter::create(&dir.path().join("missing")).await.is_err());
    }
}
