use crate::config::types::{
    Config, CrawlConfig, FetchConfig, OutputConfig, PolicyConfig, PolitenessConfig, DelayRange,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_politeness_config(&config.politeness)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the configuration and derives the run's [`PolicyConfig`]
pub fn build_policy(config: &Config) -> Result<PolicyConfig, ConfigError> {
    validate(config)?;

    Ok(PolicyConfig {
        base_url: parse_seed(&config.crawl.seed_url)?,
        delay: DelayRange::from_secs(config.politeness.min_delay, config.politeness.max_delay),
        respect_robots: config.politeness.respect_robots,
        user_agent: config.fetch.user_agent.clone(),
    })
}

/// Validates crawl scope configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    parse_seed(&config.seed_url)?;

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Parses the seed URL, which must be absolute http(s) with a host
fn parse_seed(seed: &str) -> Result<Url, ConfigError> {
    if seed.is_empty() {
        return Err(ConfigError::Validation(
            "seed_url is required".to_string(),
        ));
    }

    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use http or https",
            seed
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    Ok(url)
}

/// Upper bound for either end of the delay range (seconds)
const MAX_DELAY_SECS: f64 = 24.0 * 60.0 * 60.0;

/// Validates the politeness delay range
fn validate_politeness_config(config: &PolitenessConfig) -> Result<(), ConfigError> {
    for (name, value) in [("min_delay", config.min_delay), ("max_delay", config.max_delay)] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{} must be a non-negative number of seconds, got {}",
                name, value
            )));
        }
        if value > MAX_DELAY_SECS {
            return Err(ConfigError::Validation(format!(
                "{} must be at most {} seconds, got {}",
                name, MAX_DELAY_SECS, value
            )));
        }
    }

    if config.min_delay > config.max_delay {
        return Err(ConfigError::Validation(format!(
            "min_delay ({}) must not exceed max_delay ({})",
            config.min_delay, config.max_delay
        )));
    }

    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout must be >= 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
