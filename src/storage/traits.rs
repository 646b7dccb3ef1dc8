//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::crawler::CrawlReport;
use crate::output::ContactKind;
use crate::storage::RunRecord;
use crate::tree::CrawlTree;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Stored data is inconsistent: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Finished crawls are written once and read back as trees; nothing is
/// updated in place.
pub trait Storage {
    /// Persists a finished crawl
    ///
    /// # Arguments
    ///
    /// * `report` - The crawl report to store
    /// * `config_hash` - Hash of the configuration file, or `"defaults"`
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn save_report(&mut self, report: &CrawlReport, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run, if any
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Lists all runs, newest first
    fn list_runs(&self) -> StorageResult<Vec<RunRecord>>;

    /// Rebuilds the crawl tree of a run
    fn load_tree(&self, run_id: i64) -> StorageResult<CrawlTree>;

    /// Counts the nodes stored for a run
    fn count_nodes(&self, run_id: i64) -> StorageResult<u64>;

    /// Distinct emails or phone numbers of a run, sorted
    fn load_contacts(&self, run_id: i64, kind: ContactKind) -> StorageResult<Vec<String>>;
}
