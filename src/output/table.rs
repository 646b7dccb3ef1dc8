//! Plain-text table rendering

use crate::output::style::{paint, status_color};
use crate::tree::{CrawlNode, CrawlTree};
use reqwest::StatusCode;

const HEADERS: [&str; 6] = ["Title", "URL", "Status", "Phone Numbers", "Emails", "Category"];
const STATUS_COLUMN: usize = 2;

/// Formats a status code as `"200 OK"`, or `"-"` when absent
pub fn format_status(status: Option<u16>) -> String {
    match status {
        Some(code) => match StatusCode::from_u16(code)
            .ok()
            .and_then(|s| s.canonical_reason())
        {
            Some(reason) => format!("{} {}", code, reason),
            None => code.to_string(),
        },
        None => "-".to_string(),
    }
}

fn format_category(node: &CrawlNode) -> String {
    match &node.classification {
        Some(c) => format!("{} ({:.1}%)", c.label, c.confidence * 100.0),
        None => "-".to_string(),
    }
}

fn join_or_dash<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    let joined = values
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

fn row(node: &CrawlNode) -> [String; 6] {
    [
        node.title.clone(),
        node.url.clone(),
        format_status(node.status),
        join_or_dash(&node.phones),
        join_or_dash(&node.emails),
        format_category(node),
    ]
}

/// Renders every node as one table row, in admission order
pub fn render_table(tree: &CrawlTree) -> String {
    render_table_with(tree, false)
}

/// Like [`render_table`], colouring the status cells when `color` is set
///
/// Successful statuses are green, redirects yellow and everything else red.
pub fn render_table_with(tree: &CrawlTree, color: bool) -> String {
    let nodes = tree.nodes();
    let rows: Vec<[String; 6]> = nodes.iter().map(row).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for r in &rows {
        for (width, cell) in widths.iter_mut().zip(r.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, pad(&HEADERS.map(String::from), &widths));

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("+-{}-+\n", rule.join("-+-")));

    for (node, r) in nodes.iter().zip(&rows) {
        let mut cells = pad(r, &widths);
        // Padding first keeps escape codes out of the width
        cells[STATUS_COLUMN] = paint(&cells[STATUS_COLUMN], status_color(node.status), color);
        push_line(&mut out, cells);
    }

    out
}

fn pad(cells: &[String; 6], widths: &[usize; 6]) -> Vec<String> {
    cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect()
}

fn push_line(out: &mut String, cells: Vec<String>) {
    out.push_str(&format!("| {} |\n", cells.join(" | ")));
}
