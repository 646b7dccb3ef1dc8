//! URL handling module
//!
//! This module turns raw hrefs and seed strings into the canonical form used
//! as node identifiers, and extracts hosts for display and statistics.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, hostname};
pub use normalize::{canonicalize_url, parse_absolute};

/// Returns true if the scheme can be fetched by the crawler
pub fn is_crawlable_scheme(scheme: &str) -> bool {
    matches!(scheme, "http" | "https")
}
