use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "./crawldocs";

/// Default number of fetches in flight
pub const DEFAULT_PARALLELISM: usize = 4;

/// Default maximum crawl depth (0 means unlimited)
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of page records the output queue can hold
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Fully resolved crawl configuration
///
/// Built once at startup and read-only for the rest of the run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Seed URL the crawl starts from
    pub start_url: Url,

    /// Directory receiving the Markdown files and `index.md`
    pub output_dir: PathBuf,

    /// Maximum number of fetches in flight, across all hosts
    pub parallelism: usize,

    /// Maximum link depth from the seed; 0 means unlimited
    pub max_depth: u32,

    /// Regex a URL must match to be visited
    pub include_pattern: String,

    /// Regex that excludes a URL from being visited
    pub exclude_pattern: Option<String>,

    /// Timeout applied to each request
    pub timeout: Duration,

    /// Enable debug logging
    pub verbose: bool,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Capacity of the bounded queue between extraction and output
    pub queue_capacity: usize,
}

impl CrawlConfig {
    /// Returns true if a page at `depth` may have its links followed
    ///
    /// Links from a page at depth `d` are scheduled at `d + 1`; with a limit
    /// of `N > 0` nothing is ever scheduled beyond depth `N`.
    pub fn allows_depth(&self, depth: u32) -> bool {
        self.max_depth == 0 || depth <= self.max_depth
    }
}

/// Unresolved crawl options, as read from a TOML file or the command line
///
/// Every field is optional. Options from the command line are merged over
/// options from the file, then defaults fill whatever is still missing.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CrawlOptions {
    /// Seed URL
    pub url: Option<String>,

    /// Output directory
    pub output: Option<PathBuf>,

    /// Parallel fetch limit
    pub parallel: Option<usize>,

    /// Maximum depth (0 = unlimited)
    pub depth: Option<u32>,

    /// Include regex
    pub include: Option<String>,

    /// Exclude regex
    pub exclude: Option<String>,

    /// Request timeout, e.g. "10s" or "1m30s"
    pub timeout: Option<String>,

    /// Verbose logging
    pub verbose: Option<bool>,

    /// User-Agent header
    pub user_agent: Option<String>,

    /// Output queue capacity
    pub queue_capacity: Option<usize>,
}

impl CrawlOptions {
    /// Layers `overrides` on top of `self`; any value set in `overrides` wins
    pub fn merge(self, overrides: CrawlOptions) -> CrawlOptions {
        CrawlOptions {
            url: overrides.url.or(self.url),
            output: overrides.output.or(self.output),
            parallel: overrides.parallel.or(self.parallel),
            depth: overrides.depth.or(self.depth),
            include: overrides.include.or(self.include),
            exclude: overrides.exclude.or(self.exclude),
            timeout: overrides.timeout.or(self.timeout),
            verbose: overrides.verbose.or(self.verbose),
            user_agent: overrides.user_agent.or(self.user_agent),
            queue_capacity: overrides.queue_capacity.or(self.queue_capacity),
        }
    }
}
