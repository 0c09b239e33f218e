//! # Tweetscope Library
//!
//! A Rust library that pulls tweets matching a query from the Twitter/X search
//! APIs, flattens each tweet together with its author's metrics into one row of
//! a [`TweetTable`], and exports the table as CSV.
//!
//! ## Features
//!
//! - Recent search (past 7 days) through the v2 API
//! - 30-day and full-archive premium search, with bodies re-fetched through the
//!   v2 lookup so every mode yields the same columns
//! - Automatic pagination with page sizes kept within the API's 10..=100 bounds
//! - Waiting out rate limits instead of failing
//! - Confirmation before very large requests
//! - Keyword, hashtag and attention-over-time statistics
//!
//! ## Configuration
//!
//! - `BEARER_TOKEN`: app Bearer Token (required)
//! - `TWITTER_API_BASE`: API host (defaults to `https://api.twitter.com`)
//! - `TWITTER_30DAY_LABEL` / `TWITTER_FULLARCHIVE_LABEL`: premium dev environment labels
//!
//! ## Example
//!
//! ```rust,no_run
//! use tweetscope::{search_recent, HttpSearchClient, SearchRequest, StdinPrompt, TwitterConfig};
//!
//! # async fn run() -> tweetscope::Result<()> {
//! let client = HttpSearchClient::new(TwitterConfig::from_env()?);
//! let request = SearchRequest::new("rust").with_max_results(50);
//! let table = search_recent(&client, &mut StdinPrompt, &request).await?;
//! println!("{} tweets", table.len());
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod query;
pub mod record;
pub mod table;
pub mod twitter;
pub mod window;

// Re-export commonly used types and functions
pub use analysis::{
    attention_series, hashtag_frequencies, keyword_frequencies, AttentionSeries, Granularity,
};
pub use config::TwitterConfig;
pub use error::{Error, Result};
pub use prompt::{AssumeYes, Prompt, StdinPrompt};
pub use query::{
    search, search_30_day, search_full_archive, search_recent, SearchDepth, SearchRequest,
};
pub use record::{Field, TweetRecord};
pub use table::TweetTable;
pub use twitter::{HttpSearchClient, SearchClient};
pub use window::SearchWindow;
