//! Configuration module for golly
//!
//! Options come from the command line and, optionally, a TOML file. They are
//! merged (command line wins), filled with defaults and validated into a
//! read-only [`CrawlConfig`].
//!
//! # Example
//!
//! ```no_run
//! use golly::config::{resolve_config, CrawlOptions};
//!
//! let config = resolve_config(CrawlOptions {
//!     url: Some("https://docs.example.com/".to_string()),
//!     ..CrawlOptions::default()
//! })
//! .unwrap();
//! println!("Include pattern: {}", config.include_pattern);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlConfig, CrawlOptions, DEFAULT_MAX_DEPTH, DEFAULT_OUTPUT_DIR, DEFAULT_PARALLELISM,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_TIMEOUT,
};
pub use validation::validate;

// Re-export parser functions
pub use parser::{default_user_agent, load_config, load_options, parse_duration, resolve_config};
