//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedSet`: the set of URLs already claimed for scheduling
//! - `CrawlStats`: per-run counters reported when the crawl completes

mod stats;
mod visited;

// Re-export main types
pub use stats::CrawlStats;
pub use visited::VisitedSet;
