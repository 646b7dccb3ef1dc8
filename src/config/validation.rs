use crate::config::types::{
    ClassifierConfig, Config, CrawlerConfig, OutputConfig, ProxyConfig, UserAgentConfig,
};
use crate::ConfigError;

/// Smallest accepted per-fetch timeout
pub(crate) const MIN_FETCH_TIMEOUT_MS: u64 = 100;

/// Largest accepted worker pool
pub(crate) const MAX_WORKERS: u32 = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_proxy_config(&config.proxy)?;
    validate_output_config(&config.output)?;
    validate_classifier_config(&config.classifier)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_max_depth(config.max_depth)?;
    validate_workers(config.workers)?;
    validate_fetch_timeout(config.fetch_timeout_ms)?;
    Ok(())
}

pub(crate) fn validate_max_depth(max_depth: i64) -> Result<u32, ConfigError> {
    u32::try_from(max_depth).map_err(|_| ConfigError::InvalidDepth(max_depth))
}

pub(crate) fn validate_workers(workers: u32) -> Result<(), ConfigError> {
    if workers < 1 || workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, workers
        )));
    }
    Ok(())
}

pub(crate) fn validate_fetch_timeout(timeout_ms: u64) -> Result<(), ConfigError> {
    if timeout_ms < MIN_FETCH_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_ms must be >= {}ms, got {}ms",
            MIN_FETCH_TIMEOUT_MS, timeout_ms
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates proxy configuration
fn validate_proxy_config(config: &ProxyConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        return Ok(());
    }

    if config.host.trim().is_empty() {
        return Err(ConfigError::Validation(
            "proxy host cannot be empty".to_string(),
        ));
    }

    if config.port == 0 {
        return Err(ConfigError::Validation(
            "proxy port must be non-zero".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates classifier categories
fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    for category in &config.category {
        if category.label.trim().is_empty() {
            return Err(ConfigError::Validation(
                "classifier category label cannot be empty".to_string(),
            ));
        }

        if category.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "classifier category '{}' must have at least one keyword",
                category.label
            )));
        }
    }
    Ok(())
}
