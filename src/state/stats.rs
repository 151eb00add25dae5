//! Per-run crawl counters

use std::fmt;

/// Counters collected by the dispatch loop during a crawl
///
/// Owned by a single task, so plain integers are enough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Fetches that returned a 2xx response
    pub pages_fetched: u64,

    /// Fetches that failed (network error, timeout, non-2xx status)
    pub fetch_failures: u64,

    /// Responses skipped because they were not HTML
    pub non_html_skipped: u64,

    /// HTML pages the extractor could not handle
    pub extraction_failures: u64,

    /// Page records handed to the output queue
    pub records_queued: u64,

    /// Extracted records never queued (cancelled, or queue closed)
    pub records_dropped: u64,

    /// Links accepted by filter and Visited Set and scheduled, seed included
    pub links_scheduled: u64,

    /// Targets that were never fetched because the run was cancelled
    pub cancelled: u64,
}

impl CrawlStats {
    /// Creates zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of fetch attempts that completed one way or another
    pub fn total_attempts(&self) -> u64 {
        self.pages_fetched + self.fetch_failures
    }
}

impl fmt::Display for CrawlStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scheduled, {} fetched, {} fetch failures, {} non-HTML skipped, \
             {} extraction failures, {} queued for output",
            self.links_scheduled,
            self.pages_fetched,
            self.fetch_failures,
            self.non_html_skipped,
            self.extraction_failures,
            self.records_queued
        )?;
        if self.records_dropped > 0 {
            write!(f, ", {} dropped", self.records_dropped)?;
        }
        if self.cancelled > 0 {
            write!(f, ", {} cancelled", self.cancelled)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let stats = CrawlStats::new();
        assert_eq!(stats.total_attempts(), 0);
        assert_eq!(stats, CrawlStats::default());
    }

    #[test]
    fn test_total_attempts() {
        let stats = CrawlStats {
            pages_fetched: 7,
            fetch_failures: 3,
            ..CrawlStats::default()
        };
        assert_eq!(stats.total_attempts(), 10);
    }

    #[test]
    fn test_display_mentions_cancelled_only_when_set() {
        let mut stats = CrawlStats::new();
        assert!(!stats.to_string().contains("cancelled"));

        stats.cancelled = 2;
        assert!(stats.to_string().ends_with(", 2 cancelled"));
    }
}
