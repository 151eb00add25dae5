//! Concurrency-safe set of URLs already claimed for scheduling

use std::collections::HashSet;
use std::sync::Mutex;

/// Records every URL that has been accepted for scheduling
///
/// A URL is claimed when it is accepted, not when its fetch completes, so two
/// pages racing to discover the same link schedule it exactly once. The set
/// only grows; there is no removal.
///
/// Shared between tasks by `Arc<VisitedSet>`.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claims a URL
    ///
    /// Returns `true` if the URL was absent and is now recorded, `false` if it
    /// was already present. The membership check and insert happen under one
    /// lock acquisition.
    ///
    /// # Examples
    ///
    /// ```
    /// use golly::state::VisitedSet;
    ///
    /// let visited = VisitedSet::new();
    /// assert!(visited.try_mark("https://example.com/"));
    /// assert!(!visited.try_mark("https://example.com/"));
    /// ```
    pub fn try_mark(&self, url: &str) -> bool {
        let mut urls = match self.urls.lock() {
            Ok(guard) => guard,
            // A panicking holder cannot leave the set half-inserted
            Err(poisoned) => poisoned.into_inner(),
        };
        urls.insert(url.to_string())
    }

    /// Returns true if the URL has been claimed
    pub fn contains(&self, url: &str) -> bool {
        match self.urls.lock() {
            Ok(urls) => urls.contains(url),
            Err(poisoned) => poisoned.into_inner().contains(url),
        }
    }

    /// Number of claimed URLs
    pub fn len(&self) -> usize {
        match self.urls.lock() {
            Ok(urls) => urls.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Returns true if nothing has been claimed yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
