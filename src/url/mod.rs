//! URL handling module for golly
//!
//! This module provides URL normalization, host extraction, default include
//! pattern derivation and the include/exclude URL filter.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::{default_include_pattern, extract_host};
pub use filter::UrlFilter;
pub use normalize::normalize_url;
