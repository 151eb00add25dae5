//! Scheduler for managing the crawl frontier and global concurrency
//!
//! This module handles:
//! - The FIFO frontier of targets waiting to be fetched
//! - Global concurrency limiting via a semaphore
//!
//! The scheduler is owned by the dispatch loop alone; workers only ever see
//! the permit that travels with their target.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// A URL scheduled for fetching at a given link depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// The URL to fetch, already normalized
    pub url: Url,

    /// Link hops from the seed (the seed is depth 0)
    pub depth: u32,
}

impl CrawlTarget {
    /// Creates a target
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }
}

/// A scheduled fetch with a semaphore permit
///
/// The permit is released when this value (or the permit moved out of it)
/// is dropped.
#[derive(Debug)]
pub struct ScheduledFetch {
    /// The target to fetch
    pub target: CrawlTarget,

    /// The semaphore permit for this fetch
    pub permit: OwnedSemaphorePermit,
}

/// Scheduler manages the frontier queue and the in-flight limit
#[derive(Debug)]
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Targets waiting for a permit, oldest first
    frontier: VecDeque<CrawlTarget>,

    /// Number of permits the semaphore was created with
    parallelism: usize,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `parallelism` - Maximum number of fetches in flight, clamped to
    ///   `1..=Semaphore::MAX_PERMITS`
    ///
    /// # Returns
    ///
    /// A new Scheduler with an empty frontier
    pub fn new(parallelism: usize) -> Self {
        let parallelism = parallelism.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            semaphore: Arc::new(Semaphore::new(parallelism)),
            frontier: VecDeque::new(),
            parallelism,
        }
    }

    /// Appends a target to the frontier
    pub fn push(&mut self, target: CrawlTarget) {
        tracing::trace!("Queued {} at depth {}", target.url, target.depth);
        self.frontier.push_back(target);
    }

    /// Takes the next target if a permit is free
    ///
    /// # Returns
    ///
    /// * `Some(ScheduledFetch)` - A target that may be fetched now
    /// * `None` - The frontier is empty or every permit is taken
    pub fn next_ready(&mut self) -> Option<ScheduledFetch> {
        if self.frontier.is_empty() {
            return None;
        }

        let permit = Arc::clone(&self.semaphore).try_acquire_owned().ok()?;
        let target = self.frontier.pop_front()?;

        Some(ScheduledFetch { target, permit })
    }

    /// Drops every waiting target, returning how many there were
    pub fn clear(&mut self) -> usize {
        let dropped = self.frontier.len();
        self.frontier.clear();
        dropped
    }

    /// Returns the number of targets waiting in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns true if no target is waiting
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Returns the number of fetches currently holding a permit
    pub fn in_flight(&self) -> usize {
        self.parallelism - self.semaphore.available_permits()
    }

    /// Returns the configured parallelism
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }
}
