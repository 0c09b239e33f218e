//! Twitter/X API integration module.
//!
//! This module contains the search-client abstraction, its HTTP
//! implementation, and the pagination loops that fill a [`crate::TweetTable`].

mod api;
mod client;
mod search;

// Re-export public API
pub use api::{build_bearer_auth_header, HttpSearchClient};
pub use client::{Archive, ArchiveRequest, IdPage, RecentRequest, SearchClient, TweetPage};
pub use search::{
    collect_archive_ids, page_size, paginate_archive, paginate_recent, MAX_PAGE_SIZE,
    MIN_PAGE_SIZE,
};

// Crate-internal re-exports (used by tests)
#[allow(unused_imports)]
pub(crate) use api::{encode_query, sanitize_for_logging};
