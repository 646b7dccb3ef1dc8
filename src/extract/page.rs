//! Page-level parsing: title, visible text and artifacts in one pass

use crate::extract::links::{extract_from_document, ExtractionResult};
use scraper::{Html, Node, Selector};

/// Elements whose text is never shown to a reader
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Everything the crawler needs from one HTML document
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from the `<title>` tag), if present and non-empty
    pub title: Option<String>,

    /// Visible text, whitespace-collapsed, for the classifier
    pub text: String,

    /// Links and contacts found in anchors
    pub extraction: ExtractionResult,
}

/// Parses an HTML document once and collects title, text and artifacts
///
/// # Example
///
/// ```
/// use osint_linktree::extract::parse_page;
///
/// let page = parse_page(r#"<html><head><title> Home </title></head><body>Hi</body></html>"#);
/// assert_eq!(page.title.as_deref(), Some("Home"));
/// assert_eq!(page.text, "Hi");
/// ```
pub fn parse_page(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        text: extract_text(&document),
        extraction: extract_from_document(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects the text a reader would see, skipping scripts, styles and `<head>`
fn extract_text(document: &Html) -> String {
    let mut words: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|element| INVISIBLE_ELEMENTS.contains(&element.name()))
                .unwrap_or(false)
        });

        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}
