//! The crawl tree
//!
//! [`CrawlTree`] is the deduplicating store behind a crawl: a URL-keyed node
//! map plus parent/child adjacency. [`CrawlTree::try_insert`] is the single
//! point where concurrent discoveries are serialized, so a URL is admitted at
//! most once no matter how many pages link to it.

mod node;

pub use node::CrawlNode;
pub(crate) use node::NodeUpdate;

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct TreeInner {
    nodes: HashMap<String, CrawlNode>,
    /// URLs in admission order
    order: Vec<String>,
    /// Parent URL -> child URLs in admission order
    children: HashMap<String, Vec<String>>,
}

/// Spanning tree of the pages reached by a crawl
///
/// Safe to share between tasks; all methods take `&self`.
#[derive(Debug)]
pub struct CrawlTree {
    root: String,
    inner: RwLock<TreeInner>,
}

impl CrawlTree {
    /// Creates a tree holding only `root`
    ///
    /// The root is forced to depth 0 with no parent.
    pub fn new(mut root: CrawlNode) -> Self {
        root.depth = 0;
        root.parent = None;

        let url = root.url.clone();
        let mut inner = TreeInner::default();
        inner.order.push(url.clone());
        inner.nodes.insert(url.clone(), root);

        Self {
            root: url,
            inner: RwLock::new(inner),
        }
    }

    /// Admits a node if its URL is not in the tree yet
    ///
    /// # Returns
    ///
    /// * `true` - The node was stored
    /// * `false` - Nothing changed: the URL is already present, or the node
    ///   names no parent, or its parent is unknown or not shallower than it
    pub fn try_insert(&self, node: CrawlNode) -> bool {
        let mut inner = self.write();

        if inner.nodes.contains_key(&node.url) {
            return false;
        }

        let parent = match node.parent.as_deref() {
            Some(parent) => parent,
            None => return false,
        };
        match inner.nodes.get(parent) {
            Some(p) if p.depth < node.depth => {}
            _ => return false,
        }

        let parent = parent.to_string();
        let url = node.url.clone();
        inner.children.entry(parent).or_default().push(url.clone());
        inner.order.push(url.clone());
        inner.nodes.insert(url, node);
        true
    }

    /// Returns a copy of the node for `url`
    pub fn get(&self, url: &str) -> Option<CrawlNode> {
        self.read().nodes.get(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.read().nodes.contains_key(url)
    }

    /// Number of admitted nodes, root included
    pub fn len(&self) -> usize {
        self.read().nodes.len()
    }

    /// Always false: a tree holds at least its root
    pub fn is_empty(&self) -> bool {
        self.read().nodes.is_empty()
    }

    /// URL of the root node
    pub fn root(&self) -> &str {
        &self.root
    }

    /// All nodes in admission order
    pub fn nodes(&self) -> Vec<CrawlNode> {
        let inner = self.read();
        inner
            .order
            .iter()
            .filter_map(|url| inner.nodes.get(url).cloned())
            .collect()
    }

    /// Nodes first discovered at `depth`, in admission order
    pub fn nodes_at_depth(&self, depth: u32) -> Vec<CrawlNode> {
        let inner = self.read();
        inner
            .order
            .iter()
            .filter_map(|url| inner.nodes.get(url))
            .filter(|node| node.depth == depth)
            .cloned()
            .collect()
    }

    /// Children of `url`, in admission order
    pub fn children_of(&self, url: &str) -> Vec<CrawlNode> {
        let inner = self.read();
        inner
            .children
            .get(url)
            .map(|children| {
                children
                    .iter()
                    .filter_map(|child| inner.nodes.get(child).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// URLs from the root down to `url`, or an empty path if `url` is unknown
    pub fn path_to(&self, url: &str) -> Vec<String> {
        let inner = self.read();
        let mut path = Vec::new();
        let mut current = inner.nodes.get(url);

        while let Some(node) = current {
            path.push(node.url.clone());
            current = node.parent.as_deref().and_then(|p| inner.nodes.get(p));
        }

        path.reverse();
        path
    }

    /// Greatest depth of any node
    pub fn depth(&self) -> u32 {
        self.read()
            .nodes
            .values()
            .map(|node| node.depth)
            .max()
            .unwrap_or(0)
    }

    /// Records the processing result of an admitted node
    ///
    /// Returns false if `url` is not in the tree.
    pub(crate) fn record(&self, url: &str, update: NodeUpdate) -> bool {
        match self.write().nodes.get_mut(url) {
            Some(node) => {
                node.apply(update);
                true
            }
            None => false,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, TreeInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TreeInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PageState;
    use std::sync::Arc;
    use std::thread;

    fn sample_tree() -> CrawlTree {
        let tree = CrawlTree::new(CrawlNode::root("http://a.test/"));
        assert!(tree.try_insert(CrawlNode::discovered("http://b.test/", 1, "http://a.test/")));
        assert!(tree.try_insert(CrawlNode::discovered("http://c.test/", 1, "http://a.test/")));
        assert!(tree.try_insert(CrawlNode::discovered("http://d.test/", 2, "http://c.test/")));
        tree
    }

    #[test]
    fn test_new_tree_has_root() {
        let tree = CrawlTree::new(CrawlNode::root("http://a.test/"));
        assert_eq!(tree.root(), "http://a.test/");
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.get("http://a.test/").unwrap().depth, 0);
    }

    #[test]
    fn test_duplicate_rejected_without_mutation() {
        let tree = sample_tree();
        let before = tree.get("http://b.test/").unwrap();

        assert!(!tree.try_insert(CrawlNode::discovered("http://b.test/", 2, "http://c.test/")));
        assert!(!tree.try_insert(CrawlNode::discovered("http://a.test/", 1, "http://b.test/")));

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.get("http://b.test/").unwrap(), before);
    }

    #[test]
    fn test_insert_requires_known_shallower_parent() {
        let tree = sample_tree();

        assert!(!tree.try_insert(CrawlNode::discovered("http://x.test/", 1, "http://nowhere.test/")));
        assert!(!tree.try_insert(CrawlNode::discovered("http://x.test/", 1, "http://b.test/")));

        let mut orphan = CrawlNode::discovered("http://x.test/", 1, "http://a.test/");
        orphan.parent = None;
        assert!(!tree.try_insert(orphan));

        assert!(!tree.contains("http://x.test/"));
    }

    #[test]
    fn test_children_and_order() {
        let tree = sample_tree();

        let children: Vec<String> = tree
            .children_of("http://a.test/")
            .into_iter()
            .map(|n| n.url)
            .collect();
        assert_eq!(children, vec!["http://b.test/", "http://c.test/"]);
        assert!(tree.children_of("http://d.test/").is_empty());
        assert!(tree.children_of("http://unknown.test/").is_empty());

        let order: Vec<String> = tree.nodes().into_iter().map(|n| n.url).collect();
        assert_eq!(
            order,
            vec!["http://a.test/", "http://b.test/", "http://c.test/", "http://d.test/"]
        );
        assert_eq!(tree.nodes_at_depth(1).len(), 2);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_path_to() {
        let tree = sample_tree();
        assert_eq!(
            tree.path_to("http://d.test/"),
            vec!["http://a.test/", "http://c.test/", "http://d.test/"]
        );
        assert_eq!(tree.path_to("http://a.test/"), vec!["http://a.test/"]);
        assert!(tree.path_to("http://zzz.test/").is_empty());
    }

    #[test]
    fn test_record_updates_node() {
        let tree = sample_tree();
        let updated = tree.record(
            "http://b.test/",
            NodeUpdate {
                title: Some("B".to_string()),
                status: Some(404),
                state: PageState::HttpError,
                ..NodeUpdate::default()
            },
        );
        assert!(updated);

        let node = tree.get("http://b.test/").unwrap();
        assert_eq!(node.title, "B");
        assert_eq!(node.status, Some(404));
        assert_eq!(node.state, PageState::HttpError);

        assert!(!tree.record("http://missing.test/", NodeUpdate::default()));
    }

    #[test]
    fn test_concurrent_inserts_admit_each_url_once() {
        let tree = Arc::new(CrawlTree::new(CrawlNode::root("http://a.test/")));
        let mut handles = Vec::new();

        for worker in 0..8 {
            let tree = Arc::clone(&tree);
            handles.push(thread::spawn(move || {
                let mut admitted = 0;
                for i in 0..50 {
                    let url = format!("http://n{}.test/", i);
                    let mut node = CrawlNode::discovered(url, 1, "http://a.test/");
                    node.title = format!("worker {}", worker);
                    if tree.try_insert(node) {
                        admitted += 1;
                    }
                }
                admitted
            }));
        }

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 50);
        assert_eq!(tree.len(), 51);
        assert_eq!(tree.children_of("http://a.test/").len(), 50);
    }
}
