//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::classify::Classification;
use crate::crawler::CrawlReport;
use crate::output::ContactKind;
use crate::state::PageState;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use crate::tree::{CrawlNode, CrawlTree};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

const RUN_COLUMNS: &str =
    "id, root_url, max_depth, started_at, finished_at, config_hash, status";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
        Ok(RunRecord {
            id: row.get(0)?,
            root_url: row.get(1)?,
            max_depth: row.get(2)?,
            started_at: row.get(3)?,
            finished_at: row.get(4)?,
            config_hash: row.get(5)?,
            status: RunStatus::from_db_string(&row.get::<_, String>(6)?)
                .unwrap_or(RunStatus::Cancelled),
        })
    }

    /// Contacts of a run grouped by node URL
    fn contacts_by_url(
        &self,
        run_id: i64,
    ) -> StorageResult<HashMap<String, (BTreeSet<String>, BTreeSet<String>)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url, kind, value FROM contacts WHERE run_id = ?1")?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut contacts: HashMap<String, (BTreeSet<String>, BTreeSet<String>)> = HashMap::new();
        for row in rows {
            let (url, kind, value) = row?;
            let entry = contacts.entry(url).or_default();
            if kind == ContactKind::Emails.as_str() {
                entry.0.insert(value);
            } else if kind == ContactKind::Phones.as_str() {
                entry.1.insert(value);
            }
        }

        Ok(contacts)
    }
}

fn node_from_row(row: &Row<'_>) -> rusqlite::Result<CrawlNode> {
    let state: String = row.get(5)?;
    let label: Option<String> = row.get(6)?;
    let confidence: Option<f64> = row.get(7)?;

    let node = CrawlNode {
        url: row.get(0)?,
        parent: row.get(1)?,
        depth: row.get(2)?,
        title: row.get(3)?,
        status: row.get(4)?,
        state: PageState::from_db_string(&state).unwrap_or(PageState::Failed),
        classification: match (label, confidence) {
            (Some(label), Some(confidence)) => Some(Classification::new(label, confidence)),
            _ => None,
        },
        error: row.get(8)?,
        emails: BTreeSet::new(),
        phones: BTreeSet::new(),
    };

    Ok(node)
}

impl Storage for SqliteStorage {
    fn save_report(&mut self, report: &CrawlReport, config_hash: &str) -> StorageResult<i64> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO runs (root_url, max_depth, started_at, finished_at, config_hash, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                report.tree.root(),
                report.max_depth,
                report.started_at.to_rfc3339(),
                report.finished_at.to_rfc3339(),
                config_hash,
                RunStatus::from(report.status).to_db_string(),
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut insert_node = tx.prepare(
                "INSERT INTO nodes (run_id, url, parent_url, depth, title, status_code, state, label, confidence, error)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            let mut insert_contact = tx.prepare(
                "INSERT OR IGNORE INTO contacts (run_id, url, kind, value) VALUES (?1, ?2, ?3, ?4)",
            )?;

            for node in report.tree.nodes() {
                insert_node.execute(params![
                    run_id,
                    node.url,
                    node.parent,
                    node.depth,
                    node.title,
                    node.status,
                    node.state.to_db_string(),
                    node.classification.as_ref().map(|c| c.label.as_str()),
                    node.classification.as_ref().map(|c| c.confidence),
                    node.error,
                ])?;

                for email in &node.emails {
                    insert_contact.execute(params![
                        run_id,
                        node.url,
                        ContactKind::Emails.as_str(),
                        email
                    ])?;
                }
                for phone in &node.phones {
                    insert_contact.execute(params![
                        run_id,
                        node.url,
                        ContactKind::Phones.as_str(),
                        phone
                    ])?;
                }
            }
        }

        tx.commit()?;
        tracing::debug!("Stored run {} ({} nodes)", run_id, report.tree.len());
        Ok(run_id)
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                Self::run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS),
                [],
                Self::run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    fn list_runs(&self) -> StorageResult<Vec<RunRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM runs ORDER BY id DESC", RUN_COLUMNS))?;
        let runs = stmt
            .query_map([], Self::run_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(runs)
    }

    fn load_tree(&self, run_id: i64) -> StorageResult<CrawlTree> {
        // Fails with RunNotFound before touching nodes
        self.get_run(run_id)?;

        let mut contacts = self.contacts_by_url(run_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT url, parent_url, depth, title, status_code, state, label, confidence, error
             FROM nodes WHERE run_id = ?1 ORDER BY depth, id",
        )?;
        let mut rows = stmt
            .query_map(params![run_id], node_from_row)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();

        let mut with_contacts = |mut node: CrawlNode| {
            if let Some((emails, phones)) = contacts.remove(&node.url) {
                node.emails = emails;
                node.phones = phones;
            }
            node
        };

        let root = rows
            .next()
            .ok_or_else(|| StorageError::Corrupt(format!("run {} has no nodes", run_id)))?;
        if root.depth != 0 || root.parent.is_some() {
            return Err(StorageError::Corrupt(format!(
                "run {} does not start with a root node",
                run_id
            )));
        }

        let tree = CrawlTree::new(with_contacts(root));
        for node in rows {
            let url = node.url.clone();
            if !tree.try_insert(with_contacts(node)) {
                return Err(StorageError::Corrupt(format!(
                    "node {} of run {} cannot be attached to the tree",
                    url, run_id
                )));
            }
        }

        Ok(tree)
    }

    fn count_nodes(&self, run_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM nodes WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn load_contacts(&self, run_id: i64, kind: ContactKind) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT value FROM contacts WHERE run_id = ?1 AND kind = ?2 ORDER BY value",
        )?;
        let values = stmt
            .query_map(params![run_id, kind.as_str()], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(values)
    }
}
