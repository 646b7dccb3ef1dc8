/// Page state definitions for tracking what happened to each node
///
/// This module defines all possible outcomes of visiting a node's page.
use crate::FetchError;
use serde::Serialize;
use std::fmt;

/// Represents the state of a node's page in the crawl process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    // ===== Active States =====
    /// Node has been admitted to the tree but its page is not fetched yet
    #[default]
    Discovered,

    // ===== Terminal Success States =====
    /// Page was fetched with a 2xx response and expanded
    Processed,

    // ===== Terminal Error States =====
    /// Page answered with a non-2xx status (recorded, never expanded)
    HttpError,

    /// Fetch exceeded its timeout
    Timeout,

    /// Host could not be reached (connection refused, DNS failure, proxy down)
    Unreachable,

    /// Fetch failed for other reasons (bad body, lost worker, ...)
    Failed,
}

impl PageState {
    /// Returns true if the page has not been fetched yet
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Discovered)
    }

    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Processed)
    }

    /// Returns true if no HTTP response was received
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Timeout | Self::Unreachable | Self::Failed)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::HttpError | Self::Timeout | Self::Unreachable | Self::Failed
        )
    }

    /// Maps a fetch failure onto the state recorded for the node
    pub fn from_fetch_error(error: &FetchError) -> Self {
        match error {
            FetchError::Timeout { .. } => Self::Timeout,
            FetchError::Connect { .. } => Self::Unreachable,
            FetchError::Request { .. } | FetchError::Body { .. } | FetchError::WorkerLost { .. } => {
                Self::Failed
            }
        }
    }

    /// Maps a received HTTP status code onto the state recorded for the node
    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            Self::Processed
        } else {
            Self::HttpError
        }
    }

    /// Converts the page state to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Processed => "processed",
            Self::HttpError => "http_error",
            Self::Timeout => "timeout",
            Self::Unreachable => "unreachable",
            Self::Failed => "failed",
        }
    }

    /// Parses a page state from a database string representation
    ///
    /// Returns None if the string doesn't match any known state.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "discovered" => Some(Self::Discovered),
            "processed" => Some(Self::Processed),
            "http_error" => Some(Self::HttpError),
            "timeout" => Some(Self::Timeout),
            "unreachable" => Some(Self::Unreachable),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Discovered,
            Self::Processed,
            Self::HttpError,
            Self::Timeout,
            Self::Unreachable,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
