//! Saving trees to disk

use crate::output::ascii::render_ascii_tree;
use crate::output::json::tree_to_json_string;
use crate::tree::CrawlTree;
use crate::LinktreeError;
use std::fs;
use std::path::{Path, PathBuf};

/// File name (without extension) for a saved tree: `<root title> - Depth <d>`
///
/// Path separators and other characters that are unsafe in file names are
/// replaced by `_`.
pub fn tree_file_stem(tree: &CrawlTree, max_depth: u32) -> String {
    let title = tree
        .get(tree.root())
        .map(|root| root.title)
        .unwrap_or_else(|| tree.root().to_string());

    let sanitized: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let sanitized = sanitized.trim().trim_start_matches('.');
    let sanitized = if sanitized.is_empty() { "linktree" } else { sanitized };

    format!("{} - Depth {}", sanitized, max_depth)
}

/// Writes the ASCII tree (`.txt`) and nested JSON (`.json`) into `dir`
///
/// # Arguments
///
/// * `tree` - The finished crawl tree
/// * `dir` - Output directory, created if missing
/// * `max_depth` - Depth the crawl ran with, used in the file name
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Paths of the written files
/// * `Err(LinktreeError)` - Failed to create the directory or write a file
pub fn save_tree(
    tree: &CrawlTree,
    dir: &Path,
    max_depth: u32,
) -> Result<Vec<PathBuf>, LinktreeError> {
    fs::create_dir_all(dir)?;
    let stem = tree_file_stem(tree, max_depth);

    let txt_path = dir.join(format!("{}.txt", stem));
    fs::write(&txt_path, render_ascii_tree(tree))?;

    let json_path = dir.join(format!("{}.json", stem));
    fs::write(&json_path, tree_to_json_string(tree)?)?;

    tracing::info!("Saved tree to {} and {}", txt_path.display(), json_path.display());
    Ok(vec![txt_path, json_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::CrawlNode;
    use tempfile::TempDir;

    #[test]
    fn test_file_stem_uses_root_title() {
        let mut root = CrawlNode::root("http://a.test/");
        root.title = "Hidden Wiki".to_string();
        let tree = CrawlTree::new(root);
        assert_eq!(tree_file_stem(&tree, 2), "Hidden Wiki - Depth 2");
    }

    #[test]
    fn test_file_stem_is_sanitized() {
        let tree = CrawlTree::new(CrawlNode::root("http://a.test/"));
        assert_eq!(tree_file_stem(&tree, 1), "http___a.test_ - Depth 1");

        let mut root = CrawlNode::root("http://a.test/");
        root.title = "../..".to_string();
        let tree = CrawlTree::new(root);
        assert_eq!(tree_file_stem(&tree, 0), "_.. - Depth 0");
    }

    #[test]
    fn test_save_tree_writes_both_files() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested");

        let mut root = CrawlNode::root("http://a.test/");
        root.title = "Root".to_string();
        let tree = CrawlTree::new(root);
        tree.try_insert(CrawlNode::discovered("http://b.test/", 1, "http://a.test/"));

        let paths = save_tree(&tree, &out, 1).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("Root - Depth 1.txt"));
        assert!(paths[1].ends_with("Root - Depth 1.json"));

        let txt = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(txt.contains("└── http://b.test/"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths[1]).unwrap()).unwrap();
        assert_eq!(json["title"], "Root");
    }
}
