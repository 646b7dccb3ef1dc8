//! Per-node crawl state
//!
//! Every node in a crawl tree carries a [`PageState`] describing what happened
//! when its page was fetched.

mod page_state;

pub use page_state::PageState;
