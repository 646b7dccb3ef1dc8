//! Configuration module for osint-linktree
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and turning configuration plus command-line overrides into the
//! validated settings a crawl runs with.
//!
//! # Example
//!
//! ```no_run
//! use osint_linktree::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linktree.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod settings;
mod types;
mod validation;

// Re-export types
pub use settings::{CrawlOptions, CrawlSettings};
pub use types::{
    CategoryConfig, ClassifierConfig, Config, CrawlerConfig, OutputConfig, ParentTieBreak,
    ProxyConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, parse_config, DEFAULT_CONFIG_HASH,
};
pub use validation::validate;
