//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML link discovery
//! - Frontier scheduling under a global concurrency limit
//! - Overall crawl coordination and shutdown

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{Coordinator, Extraction, FetchEvent, FetchOutcome};
pub use fetcher::{
    build_http_client, is_html_content_type, FetchError, FetchedPage, Fetcher, HttpFetcher,
};
pub use parser::discover_links;
pub use scheduler::{CrawlTarget, ScheduledFetch, Scheduler};

use crate::config::CrawlConfig;
use crate::output::{OutputPipeline, PipelineReport};
use crate::state::{CrawlStats, VisitedSet};
use crate::GollyError;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Counters from the dispatch loop
    pub stats: CrawlStats,

    /// What the output pipeline wrote
    pub pipeline: PipelineReport,

    /// Distinct URLs claimed in the Visited Set
    pub urls_visited: usize,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages saved, {} write failures, {} URLs visited in {:.1}s ({})",
            self.pipeline.pages_saved(),
            self.pipeline.write_failures,
            self.urls_visited,
            self.elapsed.as_secs_f64(),
            self.stats
        )
    }
}

/// Runs a complete crawl operation over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Create the output directory
/// 3. Start the output pipeline
/// 4. Seed the frontier and run the dispatch loop
/// 5. Wait for the pipeline to drain
///
/// # Arguments
///
/// * `config` - The resolved crawl configuration
/// * `cancel` - Token that stops the crawl early when cancelled
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed (individual pages may have failed)
/// * `Err(GollyError)` - A startup step failed
pub async fn crawl(
    config: CrawlConfig,
    cancel: CancellationToken,
) -> Result<CrawlReport, GollyError> {
    let fetcher = HttpFetcher::new(&config)?;
    crawl_with_fetcher(config, Arc::new(fetcher), cancel).await
}

/// Runs a complete crawl with a caller-supplied [`Fetcher`]
///
/// # Errors
///
/// Returns a `GollyError` if a pattern does not compile or the output
/// directory cannot be created. Nothing is fetched in either case.
pub async fn crawl_with_fetcher(
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    cancel: CancellationToken,
) -> Result<CrawlReport, GollyError> {
    let start_time = Instant::now();
    let start_url = config.start_url.clone();
    let output_dir = config.output_dir.clone();
    let queue_capacity = config.queue_capacity.max(1);

    let visited = Arc::new(VisitedSet::new());
    let mut coordinator = Coordinator::new(config, fetcher, Arc::clone(&visited), cancel)?;

    tokio::fs::create_dir_all(&output_dir)
        .await
        .map_err(|source| GollyError::OutputDir {
            path: output_dir.display().to_string(),
            source,
        })?;

    let (pages_tx, pages_rx) = mpsc::channel(queue_capacity);
    let output = OutputPipeline::spawn(output_dir.clone(), pages_rx);

    tracing::info!(
        "Starting crawl at {}, saving to {}",
        start_url,
        output_dir.display()
    );

    coordinator.seed(&start_url);
    let stats = coordinator.run(pages_tx).await;

    let pipeline = match output.await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Output pipeline task failed: {}", e);
            PipelineReport::default()
        }
    };

    tracing::info!("All pages have been saved.");

    let report = CrawlReport {
        stats,
        pipeline,
        urls_visited: visited.len(),
        elapsed: start_time.elapsed(),
    };
    tracing::info!("Crawl complete: {}", report);

    Ok(report)
}
