//! Crawl options and their validated form
//!
//! [`CrawlOptions`] holds raw values as given by a config file or command
//! line. [`CrawlOptions::validate`] is the single gate in front of the crawl
//! engine: it either yields [`CrawlSettings`] or a fatal [`ConfigError`],
//! before any network activity.

use crate::config::types::{Config, ParentTieBreak};
use crate::config::validation::{validate_fetch_timeout, validate_max_depth, validate_workers};
use crate::url::canonicalize_url;
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Unvalidated crawl options
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Seed URL
    pub root_url: Option<String>,

    /// Maximum BFS depth; negative values are rejected
    pub max_depth: i64,

    /// Concurrent fetch limit
    pub workers: u32,

    /// Per-fetch timeout in milliseconds
    pub fetch_timeout_ms: u64,

    /// Parent assignment rule for same-level duplicate proposals
    pub tie_break: ParentTieBreak,
}

impl CrawlOptions {
    /// Options for a root URL with every other value at its default
    pub fn new(root_url: impl Into<String>, max_depth: i64) -> Self {
        let defaults = Config::default();
        Self {
            root_url: Some(root_url.into()),
            max_depth,
            ..Self::from_config(&defaults, None)
        }
    }

    /// Options from a loaded configuration
    pub fn from_config(config: &Config, root_url: Option<String>) -> Self {
        Self {
            root_url,
            max_depth: config.crawler.max_depth,
            workers: config.crawler.workers,
            fetch_timeout_ms: config.crawler.fetch_timeout_ms,
            tie_break: config.crawler.parent_tie_break,
        }
    }

    pub fn with_workers(mut self, workers: u32) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_fetch_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.fetch_timeout_ms = timeout_ms;
        self
    }

    pub fn with_tie_break(mut self, tie_break: ParentTieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Validates the options
    ///
    /// # Errors
    ///
    /// * `ConfigError::MissingRootUrl` - no root URL, or an empty one
    /// * `ConfigError::InvalidUrl` - the root URL is not an absolute http(s) URL
    /// * `ConfigError::InvalidDepth` - the maximum depth is negative
    /// * `ConfigError::Validation` - worker count or timeout out of range
    pub fn validate(&self) -> Result<CrawlSettings, ConfigError> {
        let root = self
            .root_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingRootUrl)?;

        let root_url = canonicalize_url(root)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root URL '{}': {}", root, e)))?;

        let max_depth = validate_max_depth(self.max_depth)?;
        validate_workers(self.workers)?;
        validate_fetch_timeout(self.fetch_timeout_ms)?;

        Ok(CrawlSettings {
            root_url,
            max_depth,
            workers: self.workers as usize,
            fetch_timeout: Duration::from_millis(self.fetch_timeout_ms),
            tie_break: self.tie_break,
        })
    }
}

/// Validated crawl settings
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Canonical root URL
    pub root_url: Url,

    /// Maximum BFS depth (0 = root only)
    pub max_depth: u32,

    /// Concurrent fetch limit (>= 1)
    pub workers: usize,

    /// Per-fetch timeout
    pub fetch_timeout: Duration,

    /// Parent assignment rule for same-level duplicate proposals
    pub tie_break: ParentTieBreak,
}
