use crate::classify::Classification;
use crate::state::PageState;
use crate::url::hostname;
use serde::Serialize;
use std::collections::BTreeSet;

/// One visited page of a crawl
///
/// Identified by its canonical URL. `parent` is a back-reference used for
/// path reconstruction only; a node never owns its parent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlNode {
    /// Canonical URL, unique within a tree
    pub url: String,

    /// Page title, or the URL itself when the page has none
    pub title: String,

    /// HTTP status code; None if no response was received
    pub status: Option<u16>,

    /// Topic label; None if classification was skipped or failed
    pub classification: Option<Classification>,

    /// BFS level at which the URL was first discovered (0 = root)
    pub depth: u32,

    /// URL of the node that first discovered this one; None only for the root
    pub parent: Option<String>,

    /// Outcome of the fetch
    pub state: PageState,

    /// Email addresses found in `mailto:` links
    pub emails: BTreeSet<String>,

    /// Phone numbers found in `tel:` links
    pub phones: BTreeSet<String>,

    /// Fetch or classification failure, if any
    pub error: Option<String>,
}

impl CrawlNode {
    /// Creates the root node of a crawl
    pub fn root(url: impl Into<String>) -> Self {
        Self::new(url.into(), 0, None)
    }

    /// Creates a node proposed by `parent` at the given depth
    pub fn discovered(url: impl Into<String>, depth: u32, parent: impl Into<String>) -> Self {
        Self::new(url.into(), depth, Some(parent.into()))
    }

    fn new(url: String, depth: u32, parent: Option<String>) -> Self {
        Self {
            title: url.clone(),
            url,
            status: None,
            classification: None,
            depth,
            parent,
            state: PageState::Discovered,
            emails: BTreeSet::new(),
            phones: BTreeSet::new(),
            error: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Lowercased host of the node URL
    pub fn host(&self) -> Option<String> {
        hostname(&self.url)
    }

    /// Applies the result of processing this node's page
    pub(crate) fn apply(&mut self, update: NodeUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        self.status = update.status;
        self.classification = update.classification;
        self.state = update.state;
        self.emails = update.emails;
        self.phones = update.phones;
        self.error = update.error;
    }
}

/// Fields filled in once a node's page has been processed
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeUpdate {
    pub title: Option<String>,
    pub status: Option<u16>,
    pub classification: Option<Classification>,
    pub state: PageState,
    pub emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
    pub error: Option<String>,
}
