//! Box-drawing tree rendering

use crate::tree::{CrawlNode, CrawlTree};

/// Renders the tree with `├──`/`└──` connectors, one `title (url)` per line
///
/// Children appear in admission order.
///
/// # Example
///
/// ```
/// use osint_linktree::output::render_ascii_tree;
/// use osint_linktree::{CrawlNode, CrawlTree};
///
/// let tree = CrawlTree::new(CrawlNode::root("http://a.test/"));
/// tree.try_insert(CrawlNode::discovered("http://b.test/", 1, "http://a.test/"));
///
/// assert_eq!(
///     render_ascii_tree(&tree),
///     "http://a.test/ (http://a.test/)\n└── http://b.test/ (http://b.test/)\n"
/// );
/// ```
pub fn render_ascii_tree(tree: &CrawlTree) -> String {
    let mut out = String::new();

    if let Some(root) = tree.get(tree.root()) {
        out.push_str(&node_line(&root));
        out.push('\n');
        render_children(tree, &root.url, "", &mut out);
    }

    out
}

fn render_children(tree: &CrawlTree, url: &str, prefix: &str, out: &mut String) {
    let children = tree.children_of(url);
    let count = children.len();

    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == count;
        let connector = if last { "└── " } else { "├── " };

        out.push_str(&format!("{}{}{}\n", prefix, connector, node_line(child)));

        let next_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
        render_children(tree, &child.url, &next_prefix, out);
    }
}

fn node_line(node: &CrawlNode) -> String {
    format!("{} ({})", node.title, node.url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_connectors() {
        let tree = CrawlTree::new(CrawlNode::root("http://a.test/"));
        tree.try_insert(CrawlNode::discovered("http://b.test/", 1, "http://a.test/"));
        tree.try_insert(CrawlNode::discovered("http://c.test/", 1, "http://a.test/"));
        tree.try_insert(CrawlNode::discovered("http://d.test/", 2, "http://b.test/"));
        tree.try_insert(CrawlNode::discovered("http://e.test/", 2, "http://c.test/"));

        let expected = "\
http://a.test/ (http://a.test/)
├── http://b.test/ (http://b.test/)
│   └── http://d.test/ (http://d.test/)
└── http://c.test/ (http://c.test/)
    └── http://e.test/ (http://e.test/)
";
        assert_eq!(render_ascii_tree(&tree), expected);
    }

    #[test]
    fn test_single_node() {
        let mut root = CrawlNode::root("http://a.test/");
        root.title = "Home".to_string();
        let tree = CrawlTree::new(root);

        assert_eq!(render_ascii_tree(&tree), "Home (http://a.test/)\n");
    }
}
