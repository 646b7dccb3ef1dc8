//! Storage module for persisting finished crawls
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Writing a crawl report (run, nodes, contacts) in one transaction
//! - Reading runs back and rebuilding their trees

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::crawler::CrawlStatus;
use crate::LinktreeError;
use std::path::Path;

/// Opens (or creates) a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(LinktreeError)` - Failed to open or initialize the database
pub fn open_storage(path: &Path) -> Result<SqliteStorage, LinktreeError> {
    Ok(SqliteStorage::new(path)?)
}

/// Represents a crawl run
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub id: i64,
    pub root_url: String,
    pub max_depth: u32,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
}

/// Status of a stored crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Cancelled,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl From<CrawlStatus> for RunStatus {
    fn from(status: CrawlStatus) -> Self {
        match status {
            CrawlStatus::Completed => Self::Completed,
            CrawlStatus::Cancelled { .. } => Self::Cancelled,
        }
    }
}
