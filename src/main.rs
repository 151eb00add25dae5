//! golly main entry point
//!
//! This is the command-line interface for the golly documentation crawler.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use golly::config::{load_config, resolve_config, CrawlConfig, CrawlOptions};
use golly::crawler::crawl;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// golly: crawl a documentation site into Markdown
///
/// Starting from a seed URL, golly follows links that match the include
/// pattern up to the configured depth, extracts the main content of every
/// HTML page and writes it as a Markdown file, plus an `index.md` listing
/// every saved page.
#[derive(Parser, Debug)]
#[command(name = "crawl")]
#[command(version)]
#[command(about = "Crawl a website and save its pages as Markdown", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    start: Option<String>,

    /// Seed URL (alternative to the positional argument)
    #[arg(long, conflicts_with = "start")]
    url: Option<String>,

    /// Directory to write Markdown files and index.md to [default: ./crawldocs]
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Maximum number of pages fetched at once [default: 4]
    #[arg(short, long, value_name = "N")]
    parallel: Option<usize>,

    /// Maximum link depth from the seed, 0 for unlimited [default: 3]
    #[arg(short, long, value_name = "N")]
    depth: Option<u32>,

    /// Regex a URL must match to be crawled [default: the seed's host]
    #[arg(short, long, value_name = "REGEX")]
    include: Option<String>,

    /// Regex excluding matching URLs from the crawl
    #[arg(short, long, value_name = "REGEX")]
    exclude: Option<String>,

    /// Per-request timeout, e.g. 500ms, 10s, 1m30s [default: 10s]
    #[arg(short, long, value_name = "DURATION")]
    timeout: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to a TOML file with the same options; flags override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Options given on the command line, unset flags left as None
    fn options(&self) -> CrawlOptions {
        CrawlOptions {
            url: self.start.clone().or_else(|| self.url.clone()),
            output: self.output.clone(),
            parallel: self.parallel,
            depth: self.depth,
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            timeout: self.timeout.clone(),
            verbose: self.verbose.then_some(true),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.start.is_none() && cli.url.is_none() && cli.config.is_none() {
        Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "a start URL is required (positional URL or --url)",
            )
            .exit();
    }

    let config = load(&cli)?;

    // Setup logging based on verbosity
    setup_logging(config.verbose);

    tracing::debug!("Resolved configuration: {:?}", config);
    tracing::info!(
        "Include pattern: {}, exclude pattern: {}",
        config.include_pattern,
        config.exclude_pattern.as_deref().unwrap_or("none")
    );

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    match crawl(config, cancel).await {
        Ok(report) => {
            println!(
                "Crawled {} URLs, saved {} pages",
                report.urls_visited,
                report.pipeline.pages_saved()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Resolves the configuration from the optional file and the flags
fn load(cli: &Cli) -> anyhow::Result<CrawlConfig> {
    let overrides = cli.options();

    match &cli.config {
        Some(path) => load_config(path, overrides)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => resolve_config(overrides).context("Invalid configuration"),
    }
}

/// Sets up the logging/tracing subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flag when set.
fn setup_logging(verbose: bool) {
    let default_filter = if verbose {
        "golly=debug,info"
    } else {
        "golly=info,warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Cancels the crawl on the first Ctrl-C and exits on the second
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::warn!("Cannot listen for Ctrl-C, interrupting will not save progress");
            return;
        }

        tracing::warn!("Interrupted, finishing in-flight pages (Ctrl-C again to abort)");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::error!("Aborted");
            std::process::exit(130);
        }
    });
}
