//! Tor exit-node check
//!
//! `check.torproject.org` answers with a short page telling whether the
//! request arrived over Tor and from which exit address. The verdict is in
//! the `h1` and the address in the first `p` of its `div.content`.

use crate::ReconError;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

/// Public Tor check service
pub const TOR_CHECK_URL: &str = "https://check.torproject.org/";

/// What the Tor check page reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorCheck {
    /// Verdict line, e.g. "Congratulations. This browser is configured to use Tor."
    pub header: String,

    /// Text of the paragraph carrying the address
    pub body: String,

    /// Exit address, when the page marks it up separately
    pub ip_address: Option<String>,
}

impl TorCheck {
    /// Returns true if the check page confirmed a Tor connection
    pub fn uses_tor(&self) -> bool {
        self.header.starts_with("Congratulations")
    }
}

/// Requests the check page through `client` and parses it
pub async fn check_tor(
    client: &Client,
    check_url: &str,
    timeout: Duration,
) -> Result<TorCheck, ReconError> {
    let request_error = |e: reqwest::Error| ReconError::Request {
        url: check_url.to_string(),
        message: e.to_string(),
    };

    let response = client
        .get(check_url)
        .timeout(timeout)
        .send()
        .await
        .map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ReconError::Status {
            url: check_url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(request_error)?;
    parse_tor_check(&body)
}

/// Extracts the verdict and exit address from a check page
pub fn parse_tor_check(html: &str) -> Result<TorCheck, ReconError> {
    let document = Html::parse_document(html);

    let content = select_first(document.root_element(), "div.content")
        .ok_or(ReconError::MissingElement("div.content"))?;
    let header = select_first(content, "h1")
        .map(collapsed_text)
        .filter(|text| !text.is_empty())
        .ok_or(ReconError::MissingElement("header"))?;
    let paragraph =
        select_first(content, "p").ok_or(ReconError::MissingElement("body paragraph"))?;

    Ok(TorCheck {
        header,
        body: collapsed_text(paragraph),
        ip_address: select_first(paragraph, "strong")
            .map(collapsed_text)
            .filter(|ip| !ip.is_empty()),
    })
}

fn select_first<'a>(scope: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    scope.select(&selector).next()
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
