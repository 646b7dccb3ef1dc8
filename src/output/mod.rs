//! Output module for rendering and exporting finished crawl trees
//!
//! Every function here is a read-only consumer of a [`CrawlTree`]:
//! - ASCII tree and table renderers for the console
//! - Nested JSON export and contact lists
//! - Saving a tree to text and JSON files
//! - Crawl statistics
//! - Console reports for the Tor check and site recon
//!
//! [`CrawlTree`]: crate::tree::CrawlTree

mod ascii;
mod json;
mod recon;
mod save;
pub mod stats;
mod style;
mod table;

pub use ascii::render_ascii_tree;
pub use recon::{render_site_report, render_tor_check};
pub use json::{collect_contacts, contacts_to_json, tree_to_json, tree_to_json_string, ContactKind};
pub use save::{save_tree, tree_file_stem};
pub use stats::{format_statistics, print_statistics, CrawlStatistics};
pub use table::{format_status, render_table, render_table_with};
