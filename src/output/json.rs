//! JSON export

use crate::tree::{CrawlNode, CrawlTree};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Which contact artifacts to collect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Emails,
    Phones,
}

impl ContactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emails => "email",
            Self::Phones => "phone",
        }
    }
}

impl fmt::Display for ContactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
struct JsonNode {
    #[serde(flatten)]
    node: CrawlNode,
    children: Vec<JsonNode>,
}

fn build(tree: &CrawlTree, node: CrawlNode) -> JsonNode {
    let children = tree
        .children_of(&node.url)
        .into_iter()
        .map(|child| build(tree, child))
        .collect();
    JsonNode { node, children }
}

/// Converts the tree into nested JSON, children under `children`
pub fn tree_to_json(tree: &CrawlTree) -> Value {
    match tree.get(tree.root()) {
        Some(root) => serde_json::to_value(build(tree, root)).unwrap_or(Value::Null),
        None => Value::Null,
    }
}

/// Pretty-printed nested JSON
pub fn tree_to_json_string(tree: &CrawlTree) -> Result<String, serde_json::Error> {
    match tree.get(tree.root()) {
        Some(root) => serde_json::to_string_pretty(&build(tree, root)),
        None => Ok("null".to_string()),
    }
}

/// All distinct emails or phone numbers found anywhere in the tree
pub fn collect_contacts(tree: &CrawlTree, kind: ContactKind) -> BTreeSet<String> {
    tree.nodes()
        .into_iter()
        .flat_map(|node| match kind {
            ContactKind::Emails => node.emails,
            ContactKind::Phones => node.phones,
        })
        .collect()
}

/// Sorted JSON array of all distinct emails or phone numbers
pub fn contacts_to_json(tree: &CrawlTree, kind: ContactKind) -> Value {
    Value::Array(
        collect_contacts(tree, kind)
            .into_iter()
            .map(Value::String)
            .collect(),
    )
}
