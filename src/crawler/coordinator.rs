//! Crawler coordinator - level-by-level BFS orchestration
//!
//! Each level runs in two phases:
//! - **Expand**: every frontier node is fetched, parsed and optionally
//!   classified in its own task, bounded by the worker pool. Tasks only
//!   produce outcomes; they never touch the tree's structure.
//! - **Admit**: once every task of the level has finished, the coordinator
//!   records each outcome on its node and offers the proposed child URLs to
//!   [`CrawlTree::try_insert`]. Admitted children form the next frontier.
//!
//! Level `d + 1` never starts before level `d` has drained, which keeps
//! depths well-defined and bounds fan-out.

use crate::classify::{Classification, Classifier};
use crate::config::{CrawlSettings, ParentTieBreak};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::scheduler::WorkerPool;
use crate::extract::parse_page;
use crate::state::PageState;
use crate::tree::{CrawlNode, CrawlTree, NodeUpdate};
use crate::url::canonicalize_url;
use crate::{ClassifyError, FetchError};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// How a crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStatus {
    /// Depth bound reached or no new URLs left
    Completed,

    /// Cancelled before level `at_level` was started
    Cancelled { at_level: u32 },
}

impl CrawlStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}

/// Result of a crawl run
///
/// The tree is always present, possibly partial.
#[derive(Debug)]
pub struct CrawlReport {
    pub tree: CrawlTree,
    pub status: CrawlStatus,

    /// Depth bound the crawl ran with
    pub max_depth: u32,

    /// Number of levels whose tasks all finished
    pub levels_completed: u32,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    pub fn is_complete(&self) -> bool {
        self.status == CrawlStatus::Completed
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// What processing one frontier node produced
#[derive(Debug)]
struct NodeOutcome {
    url: String,
    update: NodeUpdate,
    /// Child URLs proposed for the next level
    links: Vec<String>,
}

impl NodeOutcome {
    fn failed(url: String, error: &FetchError) -> Self {
        Self {
            update: NodeUpdate {
                state: PageState::from_fetch_error(error),
                error: Some(error.to_string()),
                ..NodeUpdate::default()
            },
            url,
            links: Vec::new(),
        }
    }
}

/// The BFS crawl engine
///
/// # Example
///
/// ```no_run
/// use osint_linktree::config::{CrawlOptions, ProxyConfig, UserAgentConfig};
/// use osint_linktree::{Crawler, HttpFetcher};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = CrawlOptions::new("http://example.onion", 2).validate()?;
/// let fetcher = HttpFetcher::new(&UserAgentConfig::default(), &ProxyConfig::default())?;
/// let report = Crawler::new(settings, Arc::new(fetcher)).crawl().await;
/// println!("{} pages", report.tree.len());
/// # Ok(())
/// # }
/// ```
pub struct Crawler {
    settings: CrawlSettings,
    fetcher: Arc<dyn PageFetcher>,
    classifier: Option<Arc<dyn Classifier>>,
    pool: WorkerPool,
}

impl Crawler {
    /// Creates a crawler with no classifier
    pub fn new(settings: CrawlSettings, fetcher: Arc<dyn PageFetcher>) -> Self {
        let pool = WorkerPool::new(settings.workers);
        Self {
            settings,
            fetcher,
            classifier: None,
            pool,
        }
    }

    /// Classifies every fetched page with `classifier`
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Runs the crawl to completion
    pub async fn crawl(&self) -> CrawlReport {
        self.crawl_with_cancellation(CancellationToken::new()).await
    }

    /// Runs the crawl, stopping at the next level boundary once `token` is
    /// cancelled
    ///
    /// Tasks of the level in progress are allowed to finish, so the returned
    /// tree is always consistent.
    pub async fn crawl_with_cancellation(&self, token: CancellationToken) -> CrawlReport {
        let started_at = Utc::now();
        let max_depth = self.settings.max_depth;
        let tree = CrawlTree::new(CrawlNode::root(self.settings.root_url.as_str()));
        let mut status = CrawlStatus::Completed;
        let mut levels_completed = 0;

        tracing::info!(
            "Starting crawl of {} (max depth {}, {} workers)",
            tree.root(),
            max_depth,
            self.pool.size()
        );

        for level in 0..=max_depth {
            if token.is_cancelled() {
                tracing::info!("Crawl cancelled before level {}", level);
                status = CrawlStatus::Cancelled { at_level: level };
                break;
            }

            let frontier: Vec<String> = tree
                .nodes_at_depth(level)
                .into_iter()
                .map(|node| node.url)
                .collect();
            if frontier.is_empty() {
                tracing::debug!("Frontier for level {} is empty", level);
                break;
            }

            tracing::info!("Level {}: expanding {} page(s)", level, frontier.len());
            let propose = level < max_depth;
            let outcomes = self.expand_level(frontier, propose).await;
            let admitted = self.admit_level(&tree, outcomes, level);
            levels_completed = level + 1;

            if propose {
                tracing::info!("Level {}: admitted {} new page(s)", level, admitted);
            }
        }

        let finished_at = Utc::now();
        tracing::info!(
            "Crawl {}: {} page(s) in {} level(s)",
            status.as_str(),
            tree.len(),
            levels_completed
        );

        CrawlReport {
            tree,
            status,
            max_depth,
            levels_completed,
            started_at,
            finished_at,
        }
    }

    /// Processes every frontier URL concurrently and waits for all of them
    async fn expand_level(&self, frontier: Vec<String>, propose: bool) -> Vec<NodeOutcome> {
        let mut pending: BTreeSet<String> = frontier.iter().cloned().collect();
        let mut tasks = JoinSet::new();

        for url in frontier {
            let pool = self.pool.clone();
            let fetcher = Arc::clone(&self.fetcher);
            let classifier = self.classifier.clone();
            let timeout = self.settings.fetch_timeout;

            tasks.spawn(async move {
                let _permit = pool.acquire().await;
                process_node(fetcher, classifier, url, timeout, propose).await
            });
        }

        let mut outcomes = Vec::with_capacity(pending.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    pending.remove(&outcome.url);
                    outcomes.push(outcome);
                }
                Err(e) => tracing::error!("Crawl worker failed: {}", e),
            }
        }

        for url in pending {
            let error = FetchError::WorkerLost { url: url.clone() };
            outcomes.push(NodeOutcome::failed(url, &error));
        }

        outcomes
    }

    /// Records outcomes on their nodes and admits proposed children
    ///
    /// Returns the number of newly admitted nodes.
    fn admit_level(&self, tree: &CrawlTree, mut outcomes: Vec<NodeOutcome>, level: u32) -> usize {
        if self.settings.tie_break == ParentTieBreak::Lexicographic {
            outcomes.sort_by(|a, b| a.url.cmp(&b.url));
        }

        let mut admitted = 0;
        for outcome in outcomes {
            for link in &outcome.links {
                let child = CrawlNode::discovered(link.as_str(), level + 1, outcome.url.as_str());
                if tree.try_insert(child) {
                    admitted += 1;
                } else {
                    tracing::debug!("Already in tree: {} (proposed by {})", link, outcome.url);
                }
            }
            tree.record(&outcome.url, outcome.update);
        }

        admitted
    }
}

/// Fetches, parses and classifies one page
async fn process_node(
    fetcher: Arc<dyn PageFetcher>,
    classifier: Option<Arc<dyn Classifier>>,
    url: String,
    timeout: Duration,
    propose: bool,
) -> NodeOutcome {
    let fetched = match tokio::time::timeout(timeout, fetcher.fetch(&url, timeout)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            url: url.clone(),
            after: timeout,
        }),
    };

    let page = match fetched {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("{}", e);
            return NodeOutcome::failed(url, &e);
        }
    };

    let parsed = parse_page(&page.body);
    let state = PageState::from_status(page.status);
    if !state.is_success() {
        tracing::warn!("{} answered with status {}", url, page.status);
    }

    let mut update = NodeUpdate {
        title: parsed.title,
        status: Some(page.status),
        state,
        emails: parsed.extraction.emails,
        phones: parsed.extraction.phones,
        ..NodeUpdate::default()
    };

    if let Some(classifier) = classifier {
        match classify_text(classifier, parsed.text).await {
            Ok(classification) => update.classification = Some(classification),
            Err(e) => {
                tracing::debug!("Could not classify {}: {}", url, e);
                update.error = Some(e.to_string());
            }
        }
    }

    let links = if propose && state.is_success() {
        parsed
            .extraction
            .links
            .into_iter()
            .filter_map(|link| canonicalize_url(&link).ok())
            .map(String::from)
            .collect()
    } else {
        Vec::new()
    };

    NodeOutcome { url, update, links }
}

/// Runs the classifier on the blocking pool
async fn classify_text(
    classifier: Arc<dyn Classifier>,
    text: String,
) -> Result<Classification, ClassifyError> {
    tokio::task::spawn_blocking(move || classifier.classify(&text))
        .await
        .map_err(|e| ClassifyError::WorkerPanicked(e.to_string()))?
}
