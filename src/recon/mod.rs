//! One-off reconnaissance requests made outside a crawl
//!
//! Both checks reuse the crawler's HTTP client, so they go through the same
//! SOCKS5 proxy as the crawl itself.

mod info;
mod tor;

pub use info::{
    find_bitcoin_addresses, find_intel, investigate, parse_robots, MetaTag, PathProbe,
    ProbeOutcome, RobotsTxt, SiteReport,
};
pub use tor::{check_tor, parse_tor_check, TorCheck, TOR_CHECK_URL};
