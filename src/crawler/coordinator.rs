//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator runs a single dispatch loop that owns the frontier, the
//! in-flight count and the statistics. Each fetch runs in its own worker
//! task holding one semaphore permit; when it finishes it reports back with
//! a [`FetchEvent`] and the loop decides what to schedule next.
//!
//! Shared between tasks:
//! - the [`VisitedSet`] (claim-before-schedule deduplication)
//! - the sender side of the output queue
//! - the cancellation token

use crate::config::CrawlConfig;
use crate::crawler::fetcher::{FetchError, FetchedPage, Fetcher};
use crate::crawler::parser::discover_links;
use crate::crawler::scheduler::{CrawlTarget, ScheduledFetch, Scheduler};
use crate::extract::{extract_document, ExtractError, PageRecord};
use crate::state::{CrawlStats, VisitedSet};
use crate::url::{normalize_url, UrlFilter};
use crate::ConfigError;
use chrono::Utc;
use scraper::Html;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Completion report sent by a worker to the dispatch loop
#[derive(Debug)]
pub struct FetchEvent {
    /// The target that was processed
    pub target: CrawlTarget,

    /// What happened to it
    pub outcome: FetchOutcome,
}

/// Result of processing one target
#[derive(Debug)]
pub enum FetchOutcome {
    /// Cancellation was requested before the fetch started
    Cancelled,

    /// The fetch failed (network error, timeout, non-2xx status)
    Failed(FetchError),

    /// The response was not HTML; nothing was extracted or discovered
    NotHtml { content_type: String },

    /// The request redirected to a URL that was already claimed elsewhere
    Redirected { final_url: Url },

    /// An HTML page was processed
    Page {
        /// Absolute, normalized links found on the page
        links: Vec<Url>,

        /// What became of the page's content
        extraction: Extraction,
    },
}

/// Fate of an HTML page's content
#[derive(Debug)]
pub enum Extraction {
    /// A record was pushed onto the output queue
    Queued,

    /// The extractor rejected the page
    Failed(ExtractError),

    /// A record was produced but not queued (cancelled, or queue closed)
    Dropped,
}

/// State shared by every worker task
struct Worker {
    fetcher: Arc<dyn Fetcher>,
    visited: Arc<VisitedSet>,
    pages: mpsc::Sender<PageRecord>,
    cancel: CancellationToken,
}

impl Worker {
    /// Fetches a target and processes the response
    async fn process(&self, target: &CrawlTarget) -> FetchOutcome {
        if self.cancel.is_cancelled() {
            return FetchOutcome::Cancelled;
        }

        tracing::info!("Visiting {}", target.url);

        match self.fetcher.fetch(&target.url).await {
            Ok(page) => self.on_fetched(target, page).await,
            Err(e) => FetchOutcome::Failed(e),
        }
    }

    /// Handles a successful response
    ///
    /// Non-HTML responses are skipped. HTML is parsed once; the document
    /// feeds both link discovery and extraction before anything is awaited,
    /// since `Html` cannot be held across an await point.
    async fn on_fetched(&self, target: &CrawlTarget, page: FetchedPage) -> FetchOutcome {
        if !page.is_html() {
            tracing::debug!(
                "Skipping non-HTML response from {} ({})",
                page.final_url,
                page.content_type
            );
            return FetchOutcome::NotHtml {
                content_type: page.content_type,
            };
        }

        if page.final_url != target.url {
            if let Ok(final_url) = normalize_url(page.final_url.as_str()) {
                if final_url != target.url && !self.visited.try_mark(final_url.as_str()) {
                    return FetchOutcome::Redirected { final_url };
                }
            }
        }

        let (links, extracted) = {
            let document = Html::parse_document(&page.body);
            let links = discover_links(&document, &page.final_url);
            let extracted = if page.body.trim().is_empty() {
                Err(ExtractError::EmptyDocument)
            } else {
                extract_document(&document, &page.final_url, Utc::now())
            };
            (links, extracted)
        };

        let extraction = match extracted {
            Ok(record) => self.enqueue(record).await,
            Err(e) => Extraction::Failed(e),
        };

        FetchOutcome::Page { links, extraction }
    }

    /// Pushes a record onto the output queue, waiting while it is full
    async fn enqueue(&self, record: PageRecord) -> Extraction {
        let url = record.url.clone();

        tokio::select! {
            biased;

            _ = self.cancel.cancelled() => {
                tracing::debug!("Dropping {} after cancellation", url);
                Extraction::Dropped
            }
            sent = self.pages.send(record) => match sent {
                Ok(()) => Extraction::Queued,
                Err(_) => {
                    tracing::warn!("Output queue closed, dropping {}", url);
                    Extraction::Dropped
                }
            },
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<CrawlConfig>,
    filter: UrlFilter,
    visited: Arc<VisitedSet>,
    fetcher: Arc<dyn Fetcher>,
    scheduler: Scheduler,
    stats: CrawlStats,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The resolved crawl configuration
    /// * `fetcher` - Where pages come from
    /// * `visited` - The Visited Set for this run
    /// * `cancel` - Token that stops the crawl when cancelled
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ConfigError)` - The include or exclude pattern does not compile
    pub fn new(
        config: CrawlConfig,
        fetcher: Arc<dyn Fetcher>,
        visited: Arc<VisitedSet>,
        cancel: CancellationToken,
    ) -> Result<Self, ConfigError> {
        let filter = UrlFilter::new(&config.include_pattern, config.exclude_pattern.as_deref())?;
        let scheduler = Scheduler::new(config.parallelism);

        Ok(Self {
            config: Arc::new(config),
            filter,
            visited,
            fetcher,
            scheduler,
            stats: CrawlStats::new(),
            cancel,
        })
    }

    /// Schedules the seed URL at depth 0
    ///
    /// The seed is claimed in the Visited Set so links back to it are never
    /// fetched again. It is scheduled even when it does not match the
    /// include pattern.
    ///
    /// Returns false if the URL is invalid or was already claimed.
    pub fn seed(&mut self, start_url: &Url) -> bool {
        let url = match normalize_url(start_url.as_str()) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot seed {}: {}", start_url, e);
                return false;
            }
        };

        if !self.filter.is_eligible(url.as_str()) {
            tracing::warn!(
                "Seed {} does not match the include pattern '{}', crawling it anyway",
                url,
                self.filter.include_pattern()
            );
        }

        if !self.visited.try_mark(url.as_str()) {
            tracing::debug!("Seed {} already visited", url);
            return false;
        }

        self.scheduler.push(CrawlTarget::new(url, 0));
        self.stats.links_scheduled += 1;
        true
    }

    /// Runs the dispatch loop until the frontier is exhausted
    ///
    /// This is the core crawling logic that:
    /// 1. Hands ready targets to worker tasks while permits are free
    /// 2. Waits for a worker to report a `FetchEvent`
    /// 3. Updates statistics and schedules newly discovered links
    ///
    /// Ends when nothing is in flight and the frontier is empty. `pages` is
    /// dropped on return, closing the output queue once the last worker is
    /// gone.
    pub async fn run(mut self, pages: mpsc::Sender<PageRecord>) -> CrawlStats {
        let worker = Arc::new(Worker {
            fetcher: Arc::clone(&self.fetcher),
            visited: Arc::clone(&self.visited),
            pages,
            cancel: self.cancel.clone(),
        });

        let (events_tx, mut events_rx) = mpsc::channel::<FetchEvent>(self.scheduler.parallelism());
        let start_time = Instant::now();
        let mut in_flight = 0usize;
        let mut cancel_seen = false;

        loop {
            if self.cancel.is_cancelled() {
                self.drop_frontier();
            } else {
                in_flight += self.dispatch_ready(&worker, &events_tx);
            }

            // Permits are released before events are sent, so with nothing
            // in flight every ready target has been dispatched.
            if in_flight == 0 {
                break;
            }

            tokio::select! {
                Some(event) = events_rx.recv() => {
                    in_flight -= 1;
                    self.handle_event(event, start_time);
                }
                _ = self.cancel.cancelled(), if !cancel_seen => {
                    cancel_seen = true;
                    tracing::info!(
                        "Cancellation requested, waiting for {} in-flight fetches",
                        in_flight
                    );
                }
                else => break,
            }
        }

        tracing::info!(
            "Crawl loop finished in {:?}: {}",
            start_time.elapsed(),
            self.stats
        );

        self.stats
    }

    /// Spawns a worker for every target that can get a permit
    fn dispatch_ready(
        &mut self,
        worker: &Arc<Worker>,
        events: &mpsc::Sender<FetchEvent>,
    ) -> usize {
        let mut spawned = 0;

        while let Some(ScheduledFetch { target, permit }) = self.scheduler.next_ready() {
            let worker = Arc::clone(worker);
            let events = events.clone();

            tokio::spawn(async move {
                let outcome = worker.process(&target).await;
                drop(permit);
                // The loop holds the receiver until every worker has reported
                let _ = events.send(FetchEvent { target, outcome }).await;
            });

            spawned += 1;
        }

        spawned
    }

    fn drop_frontier(&mut self) {
        let dropped = self.scheduler.clear();
        if dropped > 0 {
            tracing::info!("Cancelled {} queued URLs", dropped);
            self.stats.cancelled += dropped as u64;
        }
    }

    /// Applies one worker report to the statistics and the frontier
    fn handle_event(&mut self, event: FetchEvent, start_time: Instant) {
        let FetchEvent { target, outcome } = event;

        match outcome {
            FetchOutcome::Cancelled => {
                self.stats.cancelled += 1;
            }
            FetchOutcome::Failed(e) => {
                tracing::warn!("Failed to fetch {}: {}", target.url, e);
                self.stats.fetch_failures += 1;
            }
            FetchOutcome::NotHtml { content_type } => {
                tracing::debug!("Not HTML: {} ({})", target.url, content_type);
                self.record_fetched(start_time);
                self.stats.non_html_skipped += 1;
            }
            FetchOutcome::Redirected { final_url } => {
                tracing::debug!(
                    "{} redirected to already visited {}",
                    target.url,
                    final_url
                );
                self.record_fetched(start_time);
            }
            FetchOutcome::Page { links, extraction } => {
                self.record_fetched(start_time);

                match extraction {
                    Extraction::Queued => self.stats.records_queued += 1,
                    Extraction::Failed(e) => {
                        tracing::warn!("Failed to extract content from {}: {}", target.url, e);
                        self.stats.extraction_failures += 1;
                    }
                    Extraction::Dropped => self.stats.records_dropped += 1,
                }

                if !self.cancel.is_cancelled() {
                    let scheduled = self.schedule_links(&target, links);
                    tracing::debug!(
                        "Scheduled {} new links from {} (depth {})",
                        scheduled,
                        target.url,
                        target.depth
                    );
                }
            }
        }
    }

    fn record_fetched(&mut self, start_time: Instant) {
        self.stats.pages_fetched += 1;

        // Progress reporting every 10 pages
        if self.stats.pages_fetched % 10 == 0 {
            let rate = self.stats.pages_fetched as f64 / start_time.elapsed().as_secs_f64();
            tracing::info!(
                "Progress: {} pages fetched, {} in frontier, {:.2} pages/sec",
                self.stats.pages_fetched,
                self.scheduler.frontier_size(),
                rate
            );
        }
    }

    /// Filters, claims and schedules links found on `parent`
    ///
    /// Links are scheduled at `parent.depth + 1`. When that exceeds the
    /// depth limit nothing is claimed or scheduled.
    ///
    /// Returns the number of links scheduled.
    fn schedule_links(&mut self, parent: &CrawlTarget, links: Vec<Url>) -> usize {
        let depth = parent.depth.saturating_add(1);
        if !self.config.allows_depth(depth) {
            tracing::trace!("Depth limit reached at {}", parent.url);
            return 0;
        }

        let mut scheduled = 0;
        for link in links {
            if !self.filter.is_eligible(link.as_str()) {
                tracing::trace!("Filtered out {}", link);
                continue;
            }

            if !self.visited.try_mark(link.as_str()) {
                continue;
            }

            self.scheduler.push(CrawlTarget::new(link, depth));
            scheduled += 1;
        }

        self.stats.links_scheduled += scheduled as u64;
        scheduled
    }

    /// Statistics collected so far
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Number of targets waiting to be fetched
    pub fn frontier_size(&self) -> usize {
        self.scheduler.frontier_size()
    }
}
