//! Statistics over a finished crawl tree
//!
//! This module provides functionality for summarizing and displaying
//! what a crawl found.

use crate::state::PageState;
use crate::tree::CrawlTree;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Total number of nodes in the tree
    pub total_nodes: u64,

    /// Count of nodes per BFS level
    pub nodes_by_depth: BTreeMap<u32, u64>,

    /// Count of nodes by state
    pub nodes_by_state: HashMap<PageState, u64>,

    /// Number of unique hosts encountered
    pub unique_hosts: u64,

    /// Distinct email addresses across the tree
    pub total_emails: u64,

    /// Distinct phone numbers across the tree
    pub total_phones: u64,

    /// Number of classified nodes
    pub classified: u64,

    /// Count of nodes per classification label
    pub labels: BTreeMap<String, u64>,
}

impl CrawlStatistics {
    /// Computes statistics from a tree
    pub fn from_tree(tree: &CrawlTree) -> Self {
        let mut stats = Self::default();
        let mut hosts = BTreeSet::new();
        let mut emails = BTreeSet::new();
        let mut phones = BTreeSet::new();

        for node in tree.nodes() {
            stats.total_nodes += 1;
            *stats.nodes_by_depth.entry(node.depth).or_insert(0) += 1;
            *stats.nodes_by_state.entry(node.state).or_insert(0) += 1;

            if let Some(host) = node.host() {
                hosts.insert(host);
            }
            if let Some(classification) = &node.classification {
                stats.classified += 1;
                *stats.labels.entry(classification.label.clone()).or_insert(0) += 1;
            }

            emails.extend(node.emails);
            phones.extend(node.phones);
        }

        stats.unique_hosts = hosts.len() as u64;
        stats.total_emails = emails.len() as u64;
        stats.total_phones = phones.len() as u64;
        stats
    }

    /// Number of nodes in an error state
    pub fn error_count(&self) -> u64 {
        self.nodes_by_state
            .iter()
            .filter(|(state, _)| state.is_error())
            .map(|(_, count)| count)
            .sum()
    }

    /// Percentage of nodes fetched successfully
    pub fn success_rate(&self) -> f64 {
        let processed = self
            .nodes_by_state
            .get(&PageState::Processed)
            .copied()
            .unwrap_or(0);
        percentage(processed, self.total_nodes)
    }
}

fn percentage(count: u64, total: u64) -> f64 {
    if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Formats statistics as a human-readable report
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Statistics ===\n\n");

    out.push_str("Overview:\n");
    out.push_str(&format!("  Total pages: {}\n", stats.total_nodes));
    out.push_str(&format!("  Unique hosts: {}\n", stats.unique_hosts));
    out.push_str(&format!("  Emails found: {}\n", stats.total_emails));
    out.push_str(&format!("  Phone numbers found: {}\n", stats.total_phones));
    out.push('\n');

    out.push_str("Pages by Depth:\n");
    for (depth, count) in &stats.nodes_by_depth {
        out.push_str(&format!("  {}: {}\n", depth, count));
    }
    out.push('\n');

    out.push_str("Pages by State:\n");
    // Sort states by count (descending)
    let mut state_counts: Vec<_> = stats.nodes_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

    for (state, count) in state_counts {
        out.push_str(&format!(
            "  {}: {} ({:.1}%)\n",
            state,
            count,
            percentage(*count, stats.total_nodes)
        ));
    }
    out.push('\n');

    if !stats.labels.is_empty() {
        out.push_str(&format!("Categories ({} classified):\n", stats.classified));
        for (label, count) in &stats.labels {
            out.push_str(&format!("  {}: {}\n", label, count));
        }
        out.push('\n');
    }

    let processed = stats
        .nodes_by_state
        .get(&PageState::Processed)
        .unwrap_or(&0);
    out.push_str(&format!(
        "Success Rate: {:.1}% ({} / {} pages successfully processed)\n",
        stats.success_rate(),
        processed,
        stats.total_nodes
    ));

    out
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    print!("{}", format_statistics(stats));
}
