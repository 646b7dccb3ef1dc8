//! Link extraction from anchor elements
//!
//! Anchors are the only source of artifacts:
//! - `href="http(s)://..."` and other absolute URLs with a host → links
//! - `href="mailto:..."` → emails (validated)
//! - `href="tel:..."` → phone numbers (validated)
//!
//! Relative, fragment-only and otherwise malformed hrefs are dropped.

use crate::extract::contacts::{parse_mailto, parse_tel};
use crate::url::parse_absolute;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

/// Artifacts found on a single page
///
/// Sets are ordered so that iteration (and therefore the order in which links
/// are proposed to the crawler) is stable for identical input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Absolute URLs (scheme + host), fragment removed
    pub links: BTreeSet<String>,

    /// Email addresses from `mailto:` hrefs
    pub emails: BTreeSet<String>,

    /// Phone numbers from `tel:` hrefs
    pub phones: BTreeSet<String>,
}

impl ExtractionResult {
    /// Returns true if nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.emails.is_empty() && self.phones.is_empty()
    }
}

/// Extracts links, emails and phone numbers from an HTML document
///
/// # Example
///
/// ```
/// use osint_linktree::extract::extract;
///
/// let html = r#"<a href="mailto:not-an-email">x</a><a href="mailto:ok@x.com">y</a>"#;
/// let result = extract(html);
/// assert_eq!(result.emails.into_iter().collect::<Vec<_>>(), vec!["ok@x.com"]);
/// ```
pub fn extract(html: &str) -> ExtractionResult {
    let document = Html::parse_document(html);
    extract_from_document(&document)
}

/// Extracts artifacts from an already parsed document
pub fn extract_from_document(document: &Html) -> ExtractionResult {
    let mut result = ExtractionResult::default();

    let Ok(anchor_selector) = Selector::parse("a[href], area[href]") else {
        return result;
    };

    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        classify_href(href, &mut result);
    }

    result
}

/// Routes one href into the matching output set
fn classify_href(href: &str, result: &mut ExtractionResult) {
    let href = href.trim();

    if let Some(addresses) = strip_scheme(href, "mailto:") {
        result.emails.extend(parse_mailto(addresses));
        return;
    }

    if let Some(number) = strip_scheme(href, "tel:") {
        if let Some(phone) = parse_tel(number) {
            result.phones.insert(phone);
        }
        return;
    }

    match parse_absolute(href) {
        Ok(url) => {
            result.links.insert(url.to_string());
        }
        Err(e) => {
            tracing::trace!("Discarding href {:?}: {}", href, e);
        }
    }
}

/// Strips a URI scheme prefix, ignoring ASCII case
fn strip_scheme<'a>(href: &'a str, scheme: &str) -> Option<&'a str> {
    let prefix = href.get(..scheme.len())?;
    if prefix.eq_ignore_ascii_case(scheme) {
        Some(&href[scheme.len()..])
    } else {
        None
    }
}
