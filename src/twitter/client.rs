//! The search-client seam and the page shapes it returns.

use async_trait::async_trait;
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::record::AuthorLookup;
use crate::window::SearchWindow;

/// Which premium (v1.1) search product backs a long-window search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Archive {
    ThirtyDay,
    FullArchive,
}

impl Archive {
    pub fn name(&self) -> &'static str {
        match self {
            Archive::ThirtyDay => "30day",
            Archive::FullArchive => "fullarchive",
        }
    }
}

/// One call to the recent (7-day) search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentRequest {
    pub query: String,
    pub window: SearchWindow,
    pub max_results: usize,
    pub next_token: Option<String>,
    pub tweet_fields: Vec<String>,
}

/// One call to a premium search, which only identifiers are taken from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveRequest {
    pub archive: Archive,
    pub query: String,
    pub window: SearchWindow,
    pub max_results: usize,
    pub next: Option<String>,
}

/// Tweet bodies from one response, with the response's included authors.
#[derive(Clone, Debug, Default)]
pub struct TweetPage {
    pub tweets: Vec<Value>,
    pub authors: AuthorLookup,
    pub next_token: Option<String>,
}

impl TweetPage {
    /// Reads `data`, `includes.users` and `meta.next_token` from a v2 response.
    ///
    /// A response without `data` (no matches) is an empty page.
    pub fn from_response(response: &Value, operation: &str) -> Result<Self> {
        let tweets = match response.get("data") {
            Some(Value::Array(tweets)) => tweets.clone(),
            Some(_) => {
                warn!("Unexpected response format: data is not an array");
                return Err(Error::UnexpectedResponse {
                    operation: operation.to_string(),
                    reason: "data is not an array".to_string(),
                });
            }
            None => {
                if let Some(errors) = response.get("errors").and_then(|e| e.as_array()) {
                    warn!(
                        "Response for '{}' carried no data and {} errors",
                        operation,
                        errors.len()
                    );
                }
                Vec::new()
            }
        };

        let next_token = response
            .get("meta")
            .and_then(|meta| meta.get("next_token"))
            .and_then(|token| token.as_str())
            .map(String::from);

        Ok(Self {
            tweets,
            authors: AuthorLookup::from_response(response),
            next_token,
        })
    }
}

/// Tweet identifiers from one premium search response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdPage {
    pub ids: Vec<String>,
    pub next: Option<String>,
}

/// Body of a premium search response; only identifiers and the cursor are read.
#[derive(Deserialize)]
struct PremiumResponse {
    results: Vec<PremiumTweet>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Deserialize)]
struct PremiumTweet {
    #[serde(default)]
    id_str: Option<String>,
    #[serde(default)]
    id: Option<u64>,
}

impl IdPage {
    /// Reads `results[].id_str` (falling back to a numeric `id`) and `next`.
    pub fn from_response(response: &Value, operation: &str) -> Result<Self> {
        let body: PremiumResponse =
            serde_json::from_value(response.clone()).map_err(|e| Error::UnexpectedResponse {
                operation: operation.to_string(),
                reason: format!("malformed premium search body: {}", e),
            })?;

        let ids = body
            .results
            .into_iter()
            .filter_map(|tweet| tweet.id_str.or_else(|| tweet.id.map(|id| id.to_string())))
            .collect();

        let next = body.next.filter(|next| !next.is_empty());

        Ok(Self { ids, next })
    }
}

/// The three remote capabilities a search needs.
///
/// [`super::HttpSearchClient`] talks to the real API; tests substitute
/// scripted implementations.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Fetches one page of the recent search: bodies, authors and cursor.
    async fn fetch_recent(&self, request: &RecentRequest) -> Result<TweetPage>;

    /// Fetches one page of identifiers from a premium search.
    async fn fetch_ids_by_window(&self, request: &ArchiveRequest) -> Result<IdPage>;

    /// Fetches full bodies for up to 100 identifiers.
    async fn fetch_by_ids(&self, ids: &[String], tweet_fields: &[String]) -> Result<TweetPage>;
}
