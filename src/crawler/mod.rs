//! Crawler module
//!
//! This module contains the crawl engine and its page-fetching boundary:
//! - `PageFetcher` and its reqwest implementation (SOCKS5 capable)
//! - A bounded worker pool for concurrent fetches
//! - The level-barrier BFS coordinator that builds the crawl tree

mod coordinator;
mod fetcher;
mod scheduler;

pub use coordinator::{CrawlReport, CrawlStatus, Crawler};
pub use fetcher::{build_http_client, HttpFetcher, Page, PageFetcher};
pub use scheduler::WorkerPool;
