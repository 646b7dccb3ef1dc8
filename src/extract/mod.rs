//! Artifact extraction from HTML pages
//!
//! This module is a pure function of its input: it parses a document and
//! returns the absolute links, email addresses and phone numbers found in its
//! anchors, plus the page title and visible text. Nothing here touches the
//! network, and malformed markup or hrefs are never an error.

mod contacts;
mod links;
mod page;

pub use contacts::{is_valid_email, is_valid_phone, parse_mailto, parse_tel};
pub use links::{extract, extract_from_document, ExtractionResult};
pub use page::{parse_page, ParsedPage};
