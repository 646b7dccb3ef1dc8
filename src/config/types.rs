use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Main configuration structure for osint-linktree
///
/// Every section is optional in the file; missing values take the defaults
/// shown on each field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub proxy: ProxyConfig,
    pub output: OutputConfig,
    pub classifier: ClassifierConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum BFS depth from the root URL (default 1)
    ///
    /// Signed so that a negative value is reported as an invalid depth
    /// rather than as a TOML type error.
    #[serde(rename = "max-depth")]
    pub max_depth: i64,

    /// Maximum number of concurrently in-flight fetches (default 8)
    pub workers: u32,

    /// Per-fetch timeout in milliseconds (default 15000)
    #[serde(rename = "fetch-timeout-ms")]
    pub fetch_timeout_ms: u64,

    /// Which proposer becomes parent when several discover a URL in one level
    #[serde(rename = "parent-tie-break")]
    pub parent_tie_break: ParentTieBreak,

    /// Whether to classify every visited page (default false)
    pub classify: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            workers: 8,
            fetch_timeout_ms: 15_000,
            parent_tie_break: ParentTieBreak::FirstCome,
            classify: false,
        }
    }
}

/// Tie-break rule for a URL proposed by several nodes of the same level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParentTieBreak {
    /// Whichever proposal reaches the tree first wins (order of task completion)
    #[default]
    FirstCome,

    /// The proposer with the lexicographically smallest URL wins
    Lexicographic,
}

impl FromStr for ParentTieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-come" => Ok(Self::FirstCome),
            "lexicographic" => Ok(Self::Lexicographic),
            other => Err(format!(
                "unknown tie-break '{}', expected 'first-come' or 'lexicographic'",
                other
            )),
        }
    }
}

impl fmt::Display for ParentTieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstCome => write!(f, "first-come"),
            Self::Lexicographic => write!(f, "lexicographic"),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version`
    pub fn user_agent_string(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// SOCKS5 proxy configuration (Tor listens on 127.0.0.1:9050 by default)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Route every request through the proxy (default true)
    pub enabled: bool,

    /// Proxy host
    pub host: String,

    /// Proxy port
    pub port: u16,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 9050,
        }
    }
}

impl ProxyConfig {
    /// Returns the proxy URL, or None when proxying is disabled
    ///
    /// Uses `socks5h` so host names are resolved by the proxy, which is
    /// required for `.onion` addresses.
    pub fn proxy_url(&self) -> Option<String> {
        self.enabled
            .then(|| format!("socks5h://{}:{}", self.host, self.port))
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory where saved trees are written
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
        }
    }
}

/// Keyword classifier configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// `[[classifier.category]]` tables
    pub category: Vec<CategoryConfig>,
}

/// One classifier category
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    /// Label assigned to matching pages
    pub label: String,

    /// Words that indicate this category
    pub keywords: Vec<String>,
}
