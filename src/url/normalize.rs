use crate::url::is_crawlable_scheme;
use crate::UrlError;
use url::Url;

/// Parses an href as an absolute, well-formed URL
///
/// A candidate qualifies only if it carries both a scheme and a host.
/// Relative references (`/about`, `page.html`) and host-less schemes
/// (`mailto:`, `tel:`, `javascript:`) are rejected. The fragment is dropped
/// because it never changes which page is fetched.
///
/// # Examples
///
/// ```
/// use osint_linktree::url::parse_absolute;
///
/// assert!(parse_absolute("http://b.test").is_ok());
/// assert!(parse_absolute("/relative").is_err());
/// assert!(parse_absolute("mailto:ok@x.com").is_err());
/// ```
pub fn parse_absolute(href: &str) -> Result<Url, UrlError> {
    let href = href.trim();
    if href.is_empty() {
        return Err(UrlError::Parse("empty href".to_string()));
    }

    let mut url = Url::parse(href).map_err(|e| UrlError::Parse(e.to_string()))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingHost),
    }

    url.set_fragment(None);
    Ok(url)
}

/// Canonicalizes a URL into the identifier form used by the crawl tree
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Require an HTTP or HTTPS scheme
/// 3. Require a host (the parser lowercases it and drops default ports)
/// 4. Remove the fragment
/// 5. An empty path becomes `/`
///
/// Paths, queries and `www.` prefixes are kept as written: two spellings that
/// differ there may be different pages on hidden services.
///
/// # Examples
///
/// ```
/// use osint_linktree::url::canonicalize_url;
///
/// let url = canonicalize_url("http://A.TEST:80#top").unwrap();
/// assert_eq!(url.as_str(), "http://a.test/");
/// ```
pub fn canonicalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = parse_absolute(url_str)?;

    if !is_crawlable_scheme(url.scheme()) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}
