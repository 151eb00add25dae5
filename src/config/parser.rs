use crate::config::types::{
    CrawlConfig, CrawlOptions, DEFAULT_MAX_DEPTH, DEFAULT_OUTPUT_DIR, DEFAULT_PARALLELISM,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_TIMEOUT,
};
use crate::config::validation::validate;
use crate::url::{default_include_pattern, normalize_url};
use crate::ConfigError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Loads crawl options from a TOML file
///
/// Keys use kebab-case and mirror the command-line flags:
///
/// ```toml
/// url = "https://docs.example.com/"
/// output = "./docs"
/// parallel = 8
/// depth = 0
/// exclude = "/changelog/"
/// timeout = "30s"
/// ```
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file cannot be read and
/// `ConfigError::Parse` for invalid TOML or unknown keys.
pub fn load_options(path: &Path) -> Result<CrawlOptions, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let options: CrawlOptions = toml::from_str(&content)?;
    Ok(options)
}

/// Resolves options into a validated configuration
///
/// Missing values fall back to defaults. When no include pattern is given it
/// is derived from the start URL's host.
///
/// # Errors
///
/// Returns a `ConfigError` if the start URL is missing or invalid, the
/// timeout cannot be parsed, or validation fails.
pub fn resolve_config(options: CrawlOptions) -> Result<CrawlConfig, ConfigError> {
    let raw_url = options
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ConfigError::Validation("a start URL is required".to_string()))?;

    let start_url = normalize_url(&raw_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", raw_url, e)))?;

    let include_pattern = match options.include.filter(|p| !p.is_empty()) {
        Some(pattern) => pattern,
        None => default_include_pattern(&start_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", raw_url, e))
        })?,
    };

    let timeout = match options.timeout {
        Some(raw) => parse_duration(&raw)?,
        None => DEFAULT_TIMEOUT,
    };

    let config = CrawlConfig {
        start_url,
        output_dir: options
            .output
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        parallelism: options.parallel.unwrap_or(DEFAULT_PARALLELISM),
        max_depth: options.depth.unwrap_or(DEFAULT_MAX_DEPTH),
        include_pattern,
        exclude_pattern: options.exclude.filter(|p| !p.is_empty()),
        timeout,
        verbose: options.verbose.unwrap_or(false),
        user_agent: options.user_agent.unwrap_or_else(default_user_agent),
        queue_capacity: options.queue_capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY),
    };

    validate(&config)?;

    Ok(config)
}

/// Loads a TOML file, layers `overrides` over it and resolves the result
///
/// # Errors
///
/// See [`load_options`] and [`resolve_config`].
pub fn load_config(path: &Path, overrides: CrawlOptions) -> Result<CrawlConfig, ConfigError> {
    let file_options = load_options(path)?;
    resolve_config(file_options.merge(overrides))
}

/// User-Agent sent when none is configured
pub fn default_user_agent() -> String {
    format!("golly/{}", env!("CARGO_PKG_VERSION"))
}

/// Parses a duration such as `10s`, `250ms`, `1m30s`, `1.5h` or a bare
/// number of seconds
///
/// Supported units: `ns`, `us`, `µs`, `ms`, `s`, `m`, `h`.
///
/// # Examples
///
/// ```
/// use golly::config::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
/// assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
/// assert_eq!(parse_duration("5").unwrap(), Duration::from_secs(5));
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration(input.to_string());
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(invalid());
    }

    if let Ok(secs) = trimmed.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let is_number_char = |c: char| c.is_ascii_digit() || c == '.';
    let mut total = Duration::ZERO;
    let mut rest = trimmed;

    while !rest.is_empty() {
        let number_end = rest.find(|c: char| !is_number_char(c)).ok_or_else(invalid)?;
        if number_end == 0 {
            return Err(invalid());
        }
        let (number, tail) = rest.split_at(number_end);

        let unit_end = tail.find(is_number_char).unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);

        let value: f64 = number.parse().map_err(|_| invalid())?;
        let unit_nanos: f64 = match unit {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return Err(invalid()),
        };

        let nanos = value * unit_nanos;
        if !nanos.is_finite() || nanos > u64::MAX as f64 {
            return Err(invalid());
        }

        total = total
            .checked_add(Duration::from_nanos(nanos.round() as u64))
            .ok_or_else(invalid)?;
        rest = next;
    }

    Ok(total)
}
