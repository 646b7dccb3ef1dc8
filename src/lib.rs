//! osint-linktree: a depth-bounded OSINT link crawler
//!
//! This crate discovers the pages reachable from a seed URL up to a fixed depth,
//! collapses the link graph into a tree of visited pages (one node per URL),
//! and extracts outbound links, email addresses and phone numbers from every
//! page. Pages can optionally be tagged with a topic by a classifier.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod recon;
pub mod state;
pub mod storage;
pub mod tree;
pub mod url;

use std::time::Duration;
use thiserror::Error;

/// Main error type for osint-linktree operations
#[derive(Debug, Error)]
pub enum LinktreeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Recon error: {0}")]
    Recon(#[from] ReconError),
}

/// Configuration-specific errors
///
/// These are the only fatal errors of a crawl; they are raised before any
/// network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid max depth {0}: must be zero or greater")]
    InvalidDepth(i64),

    #[error("No root URL given")]
    MissingRootUrl,
}

/// Failure to retrieve a page
///
/// Recorded on the node that failed; never aborts a crawl.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("Could not connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Worker for {url} stopped before reporting a result")]
    WorkerLost { url: String },
}

/// Failure of the page classifier
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Classification failed: {0}")]
    Failed(String),

    #[error("Nothing to classify: page text is empty")]
    EmptyInput,

    #[error("Classifier panicked: {0}")]
    WorkerPanicked(String),
}

/// Failure of a one-off reconnaissance request
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconError {
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("Could not find {0} in the response")]
    MissingElement(&'static str),
}

/// URL-specific errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for osint-linktree operations
pub type Result<T> = std::result::Result<T, LinktreeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use classify::{Classification, Classifier, KeywordClassifier};
pub use config::{Config, CrawlOptions, CrawlSettings, ParentTieBreak};
pub use crawler::{CrawlReport, CrawlStatus, Crawler, HttpFetcher, Page, PageFetcher};
pub use extract::{extract, ExtractionResult};
pub use state::PageState;
pub use tree::{CrawlNode, CrawlTree};
