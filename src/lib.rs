//! golly: a documentation site crawler
//!
//! This crate crawls a website from a seed URL, extracts the main content of
//! every HTML page it finds, converts it to Markdown and writes one file per
//! page plus an `index.md` into an output directory.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for golly operations
///
/// Only startup failures surface through this type. Errors for individual
/// pages are logged and counted, never propagated.
#[derive(Debug, Error)]
pub enum GollyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: String,
        source: std::io::Error,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid {which} pattern '{pattern}': {source}")]
    InvalidPattern {
        which: &'static str,
        pattern: String,
        source: regex::Error,
    },

    #[error("Invalid duration '{0}'")]
    InvalidDuration(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{crawl, CrawlReport};
pub use extract::{extract, PageRecord};
pub use state::VisitedSet;
pub use crate::url::{normalize_url, UrlFilter};
