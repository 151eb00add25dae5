use crate::config::types::CrawlConfig;
use crate::url::UrlFilter;
use crate::ConfigError;
use std::time::Duration;

/// Validates the entire configuration
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_start_url(config)?;
    validate_parallelism(config.parallelism)?;
    validate_timeout(config.timeout)?;
    validate_queue_capacity(config.queue_capacity)?;
    validate_user_agent(&config.user_agent)?;
    validate_output_dir(config)?;

    // Malformed patterns are fatal here rather than per URL
    UrlFilter::new(&config.include_pattern, config.exclude_pattern.as_deref())?;

    Ok(())
}

/// Validates the seed URL scheme and host
fn validate_start_url(config: &CrawlConfig) -> Result<(), ConfigError> {
    let url = &config.start_url;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' must use http or https",
            url
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' has no host",
            url
        )));
    }

    Ok(())
}

fn validate_parallelism(parallelism: usize) -> Result<(), ConfigError> {
    if parallelism < 1 {
        return Err(ConfigError::Validation(
            "parallel must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_timeout(timeout: Duration) -> Result<(), ConfigError> {
    if timeout.is_zero() {
        return Err(ConfigError::Validation(
            "timeout must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_queue_capacity(capacity: usize) -> Result<(), ConfigError> {
    if capacity < 1 {
        return Err(ConfigError::Validation(
            "queue-capacity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if user_agent.chars().any(char::is_control) {
        return Err(ConfigError::Validation(format!(
            "user-agent contains control characters: {:?}",
            user_agent
        )));
    }

    Ok(())
}

fn validate_output_dir(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }
    Ok(())
}
