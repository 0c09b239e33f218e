//! Top-level search entry points for each search depth.
//!
//! Each entry point applies the large-request confirmation, parses the date
//! window, runs the matching pagination mode and optionally exports the
//! resulting table.

use log::info;
use std::path::PathBuf;

use crate::error::Result;
use crate::extract::default_tweet_fields;
use crate::prompt::{confirm_large_request, Prompt};
use crate::table::TweetTable;
use crate::twitter::{paginate_archive, paginate_recent, Archive, SearchClient};
use crate::window::SearchWindow;

/// Number of tweets requested when the caller does not say otherwise.
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Language filter appended to queries by default.
pub const DEFAULT_LANG: &str = "en";

/// How far back a search reaches, which also decides the API calls used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchDepth {
    /// Recent search, the past 7 days.
    Recent,
    /// Premium 30-day search.
    ThirtyDay,
    /// Premium full-archive search.
    FullArchive,
}

impl SearchDepth {
    /// Requests above this many tweets need confirmation.
    pub fn confirmation_threshold(&self) -> usize {
        match self {
            SearchDepth::Recent => 50_000,
            SearchDepth::ThirtyDay | SearchDepth::FullArchive => 1_000,
        }
    }

    /// File name used when exporting without an explicit path.
    pub fn default_export_file(&self) -> &'static str {
        match self {
            SearchDepth::Recent => "search_7.csv",
            SearchDepth::ThirtyDay => "search_30.csv",
            SearchDepth::FullArchive => "search_full.csv",
        }
    }

    fn archive(&self) -> Option<Archive> {
        match self {
            SearchDepth::Recent => None,
            SearchDepth::ThirtyDay => Some(Archive::ThirtyDay),
            SearchDepth::FullArchive => Some(Archive::FullArchive),
        }
    }
}

/// Parameters of one search call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// Free-form start date, e.g. `2022-03-01` or `March 1, 2022 14:00`.
    pub start: Option<String>,
    /// Free-form end date.
    pub end: Option<String>,
    pub max_results: usize,
    /// Appended to the query as `lang:{lang}` when set.
    pub lang: Option<String>,
    /// Where to write the CSV export, if anywhere.
    pub export: Option<PathBuf>,
    pub tweet_fields: Vec<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            start: None,
            end: None,
            max_results: DEFAULT_MAX_RESULTS,
            lang: Some(DEFAULT_LANG.to_string()),
            export: None,
            tweet_fields: default_tweet_fields(),
        }
    }

    pub fn with_window(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start = start.map(String::from);
        self.end = end.map(String::from);
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_lang(mut self, lang: Option<&str>) -> Self {
        self.lang = lang.map(String::from);
        self
    }

    pub fn with_export(mut self, path: impl Into<PathBuf>) -> Self {
        self.export = Some(path.into());
        self
    }

    /// The query text actually sent, including the language filter.
    pub fn full_query(&self) -> String {
        match &self.lang {
            Some(lang) => format!("{} lang:{}", self.query, lang),
            None => self.query.clone(),
        }
    }
}

/// Runs a search at the given depth.
///
/// # Errors
///
/// - [`crate::Error::UserAborted`] if a large request is declined
/// - [`crate::Error::InvalidDate`] if a date bound cannot be parsed
/// - anything the client, extraction or export returns
pub async fn search<C, P>(
    client: &C,
    prompt: &mut P,
    depth: SearchDepth,
    request: &SearchRequest,
) -> Result<TweetTable>
where
    C: SearchClient + ?Sized,
    P: Prompt + ?Sized,
{
    if request.max_results > depth.confirmation_threshold() {
        confirm_large_request(prompt, request.max_results)?;
    }

    let window = SearchWindow::parse(request.start.as_deref(), request.end.as_deref())?;
    let query = request.full_query();
    info!(
        "Starting {:?} search for '{}' ({} tweets)",
        depth, query, request.max_results
    );

    let table = match depth.archive() {
        None => {
            paginate_recent(
                client,
                &query,
                window,
                request.max_results,
                &request.tweet_fields,
            )
            .await?
        }
        Some(archive) => {
            paginate_archive(
                client,
                archive,
                &query,
                window,
                request.max_results,
                &request.tweet_fields,
            )
            .await?
        }
    };

    if let Some(path) = &request.export {
        table.export_csv(path)?;
    }

    Ok(table)
}

/// Searches tweets from the past 7 days.
pub async fn search_recent<C, P>(
    client: &C,
    prompt: &mut P,
    request: &SearchRequest,
) -> Result<TweetTable>
where
    C: SearchClient + ?Sized,
    P: Prompt + ?Sized,
{
    search(client, prompt, SearchDepth::Recent, request).await
}

/// Searches tweets from the past 30 days.
pub async fn search_30_day<C, P>(
    client: &C,
    prompt: &mut P,
    request: &SearchRequest,
) -> Result<TweetTable>
where
    C: SearchClient + ?Sized,
    P: Prompt + ?Sized,
{
    search(client, prompt, SearchDepth::ThirtyDay, request).await
}

/// Searches the full tweet archive.
pub async fn search_full_archive<C, P>(
    client: &C,
    prompt: &mut P,
    request: &SearchRequest,
) -> Result<TweetTable>
where
    C: SearchClient + ?Sized,
    P: Prompt + ?Sized,
{
    search(client, prompt, SearchDepth::FullArchive, request).await
}
