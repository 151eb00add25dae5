//! Output module for persisting extracted pages
//!
//! This module handles:
//! - Turning page titles into safe, unique file names
//! - Writing one Markdown file per page
//! - Maintaining `index.md` with a line per saved page
//! - Running all of the above as a single consumer of a bounded queue

mod index;
mod naming;
mod pipeline;

pub use index::{IndexEntry, IndexWriter, INDEX_FILENAME, INDEX_HEADER};
pub use naming::{
    create_unique_file, sanitize_filename, DEFAULT_FILENAME, MAX_FILENAME_CHARS, MAX_STEM_BYTES,
    PAGE_EXTENSION,
};
pub use pipeline::{OutputPipeline, PipelineReport};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting a page
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to append to index: {0}")]
    Index(std::io::Error),
}
