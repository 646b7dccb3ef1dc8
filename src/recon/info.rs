//! Reconnaissance of a single site
//!
//! [`investigate`] fetches the seed page once and looks around it:
//! - `robots.txt` at the site root, reduced to the concrete paths it names
//! - well-known files that should never be served (`.git`, `.svn`, `.htaccess`)
//! - "intel" in the page source: email addresses and AWS endpoints
//! - bitcoin addresses in the visible text
//! - meta tags, including the page description

use crate::extract::{is_valid_email, parse_page};
use crate::ReconError;
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use robotstxt::{parse_robotstxt, RobotsParseHandler};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::time::Duration;
use url::Url;

/// Files probed at the site root, with what their exposure means
static SENSITIVE_PATHS: [(&str, &str); 3] = [
    (".git/config", "git repository"),
    (".svn/entries", "subversion checkout"),
    (".htaccess", "htaccess file"),
];

static INTEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\w.-]+\.amazonaws\.com|[\w.+-]+@[\w-]+(?:\.[\w-]+)+").unwrap()
});

static BITCOIN_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[13][a-km-zA-HJ-NP-Z1-9]{25,34}\b").unwrap());

/// Result of requesting one sensitive path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Served with a success status
    Exposed { status: u16 },

    /// Present but access is denied
    Forbidden,

    /// Any other status
    Absent { status: u16 },

    /// No response at all
    Failed { message: String },
}

/// One sensitive-path check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathProbe {
    pub path: &'static str,
    pub description: &'static str,
    pub url: String,
    pub outcome: ProbeOutcome,
}

impl PathProbe {
    pub fn is_exposed(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Exposed { .. })
    }
}

/// A `robots.txt` that was served
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsTxt {
    pub url: String,

    /// Absolute URLs of the allowed and disallowed paths; wildcard rules
    /// are left out
    pub entries: BTreeSet<String>,

    /// Sitemap URLs announced by the file
    pub sitemaps: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    /// Value of `name`, `property`, `http-equiv` or `itemprop`
    pub name: String,
    pub content: String,
}

/// Everything [`investigate`] learned about a site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteReport {
    pub url: String,
    pub status: u16,
    pub title: Option<String>,
    pub robots: Option<RobotsTxt>,
    pub probes: Vec<PathProbe>,
    pub intel: BTreeSet<String>,
    pub bitcoin_addresses: BTreeSet<String>,
    pub meta: Vec<MetaTag>,
}

impl SiteReport {
    /// Content of the `description` meta tag
    pub fn description(&self) -> Option<&str> {
        self.meta
            .iter()
            .find(|tag| tag.name.eq_ignore_ascii_case("description"))
            .map(|tag| tag.content.as_str())
    }

    /// Probes whose path was served
    pub fn exposed(&self) -> impl Iterator<Item = &PathProbe> {
        self.probes.iter().filter(|probe| probe.is_exposed())
    }
}

/// Fetches `url` and runs every check against its site
///
/// Only a failure to fetch the page itself is an error; failed side
/// requests are recorded in the report.
pub async fn investigate(
    client: &Client,
    url: &Url,
    timeout: Duration,
) -> Result<SiteReport, ReconError> {
    tracing::info!("Gathering information on {}", url);

    let (status, body) = get_text(client, url.as_str(), timeout)
        .await
        .map_err(|e| ReconError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let root = site_root(url);
    let probes = SENSITIVE_PATHS
        .iter()
        .map(|&(path, description)| probe_path(client, &root, path, description, timeout));
    let (robots, probes) = tokio::join!(fetch_robots(client, &root, timeout), join_all(probes));

    let page = parse_page(&body);
    Ok(SiteReport {
        url: url.to_string(),
        status: status.as_u16(),
        title: page.title,
        robots,
        probes,
        intel: find_intel(&body),
        bitcoin_addresses: find_bitcoin_addresses(&page.text),
        meta: meta_tags(&body),
    })
}

async fn get_text(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<(StatusCode, String), reqwest::Error> {
    let response = client.get(url).timeout(timeout).send().await?;
    let status = response.status();
    let body = response.text().await?;
    Ok((status, body))
}

/// `scheme://host[:port]/` of a URL
fn site_root(url: &Url) -> String {
    let mut root = url.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root.to_string()
}

async fn probe_path(
    client: &Client,
    root: &str,
    path: &'static str,
    description: &'static str,
    timeout: Duration,
) -> PathProbe {
    let url = format!("{}{}", root, path);
    let outcome = match client.get(&url).timeout(timeout).send().await {
        Ok(response) => outcome_for(response.status()),
        Err(e) => ProbeOutcome::Failed {
            message: e.to_string(),
        },
    };

    if matches!(outcome, ProbeOutcome::Exposed { .. }) {
        tracing::warn!("{} exposed at {}", description, url);
    }

    PathProbe {
        path,
        description,
        url,
        outcome,
    }
}

fn outcome_for(status: StatusCode) -> ProbeOutcome {
    if status.is_success() {
        ProbeOutcome::Exposed {
            status: status.as_u16(),
        }
    } else if status == StatusCode::FORBIDDEN {
        ProbeOutcome::Forbidden
    } else {
        ProbeOutcome::Absent {
            status: status.as_u16(),
        }
    }
}

async fn fetch_robots(client: &Client, root: &str, timeout: Duration) -> Option<RobotsTxt> {
    let url = format!("{}robots.txt", root);
    match get_text(client, &url, timeout).await {
        Ok((status, body)) if status.is_success() => Some(parse_robots(root, &body)),
        Ok((status, _)) => {
            tracing::debug!("No robots.txt at {} ({})", url, status);
            None
        }
        Err(e) => {
            tracing::warn!("Could not fetch {}: {}", url, e);
            None
        }
    }
}

/// Collects path rules and sitemaps, for every user agent
#[derive(Debug, Default)]
struct RuleCollector {
    paths: Vec<String>,
    sitemaps: Vec<String>,
}

impl RobotsParseHandler for RuleCollector {
    fn handle_robots_start(&mut self) {}

    fn handle_robots_end(&mut self) {}

    fn handle_user_agent(&mut self, _line_num: u32, _user_agent: &str) {}

    fn handle_allow(&mut self, _line_num: u32, value: &str) {
        self.paths.push(value.to_string());
    }

    fn handle_disallow(&mut self, _line_num: u32, value: &str) {
        self.paths.push(value.to_string());
    }

    fn handle_sitemap(&mut self, _line_num: u32, value: &str) {
        self.sitemaps.push(value.to_string());
    }

    fn handle_unknown_action(&mut self, _line_num: u32, _action: &str, _value: &str) {}
}

/// Parses the robots file served at `root`
///
/// `Allow`/`Disallow` paths become absolute URLs; empty and wildcard rules
/// are dropped.
pub fn parse_robots(root: &str, body: &str) -> RobotsTxt {
    let mut collector = RuleCollector::default();
    parse_robotstxt(body, &mut collector);

    let entries = collector
        .paths
        .iter()
        .map(|path| path.trim().trim_end_matches('$'))
        .filter(|path| !path.is_empty() && !path.contains('*'))
        .map(|path| format!("{}{}", root, path.trim_start_matches('/')))
        .collect();

    RobotsTxt {
        url: format!("{}robots.txt", root),
        entries,
        sitemaps: collector
            .sitemaps
            .into_iter()
            .filter(|sitemap| !sitemap.is_empty())
            .collect(),
    }
}

/// Email addresses and AWS endpoints anywhere in the page source
pub fn find_intel(source: &str) -> BTreeSet<String> {
    INTEL
        .find_iter(source)
        .map(|m| m.as_str().trim_end_matches('.'))
        .filter(|found| !found.contains('@') || is_valid_email(found))
        .map(str::to_string)
        .collect()
}

/// Legacy (P2PKH and P2SH) bitcoin addresses in `text`
pub fn find_bitcoin_addresses(text: &str) -> BTreeSet<String> {
    BITCOIN_ADDRESS
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn meta_tags(html: &str) -> Vec<MetaTag> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("meta[content]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let meta = element.value();
            let name = ["name", "property", "http-equiv", "itemprop"]
                .iter()
                .find_map(|attr| meta.attr(attr))?;
            Some(MetaTag {
                name: name.to_string(),
                content: meta.attr("content")?.trim().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_root_drops_path_and_query() {
        let url = Url::parse("http://a.test:8080/x/y?q=1#f").unwrap();
        assert_eq!(site_root(&url), "http://a.test:8080/");
    }

    #[test]
    fn test_parse_robots_skips_wildcards() {
        let body = "User-agent: *\nDisallow:\nDisallow: /admin\nAllow: /public/\n\
                    disallow: /*.php\n\nUser-agent: bot\nDisallow: /old$\n\
                    Sitemap: http://a.test/sitemap.xml\n";
        let robots = parse_robots("http://a.test/", body);

        assert_eq!(robots.url, "http://a.test/robots.txt");
        let entries: Vec<String> = robots.entries.into_iter().collect();
        assert_eq!(
            entries,
            vec!["http://a.test/admin", "http://a.test/old", "http://a.test/public/"]
        );
        assert!(robots.sitemaps.contains("http://a.test/sitemap.xml"));
    }

    #[test]
    fn test_find_intel() {
        let source = r#"
            <script>var bucket = "media.s3.amazonaws.com";</script>
            Write to admin@market.onion. or to bad@@x
        "#;
        let intel: Vec<String> = find_intel(source).into_iter().collect();
        assert_eq!(intel, vec!["admin@market.onion", "media.s3.amazonaws.com"]);
    }

    #[test]
    fn test_find_bitcoin_addresses() {
        let text = "Donate: 1BoatSLRHtKNngkdXEeobR76b53LETtpyT or 3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy. \
                    Not 0BoatSLRHtKNngkdXEeobR76b53LETtpyT nor 1short";
        let found: Vec<String> = find_bitcoin_addresses(text).into_iter().collect();
        assert_eq!(
            found,
            vec![
                "1BoatSLRHtKNngkdXEeobR76b53LETtpyT",
                "3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy"
            ]
        );
    }

    #[test]
    fn test_outcome_for_status() {
        assert_eq!(
            outcome_for(StatusCode::OK),
            ProbeOutcome::Exposed { status: 200 }
        );
        assert_eq!(outcome_for(StatusCode::FORBIDDEN), ProbeOutcome::Forbidden);
        assert_eq!(
            outcome_for(StatusCode::NOT_FOUND),
            ProbeOutcome::Absent { status: 404 }
        );
    }

    #[test]
    fn test_meta_tags_and_description() {
        let html = r#"<html><head>
            <meta charset="utf-8">
            <meta name="description" content=" Hidden wiki mirror ">
            <meta property="og:title" content="Wiki">
            <meta content="orphan">
        </head></html>"#;
        let meta = meta_tags(html);
        assert_eq!(meta.len(), 2);

        let report = SiteReport {
            url: "http://a.test/".to_string(),
            status: 200,
            title: None,
            robots: None,
            probes: Vec::new(),
            intel: BTreeSet::new(),
            bitcoin_addresses: BTreeSet::new(),
            meta,
        };
        assert_eq!(report.description(), Some("Hidden wiki mirror"));
        assert_eq!(report.exposed().count(), 0);
    }
}
