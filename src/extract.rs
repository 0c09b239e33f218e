//! Flattening of v2 tweet objects into [`TweetRecord`] rows.

use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::record::{AuthorLookup, Field, TweetRecord, ENGAGEMENT_METRICS};
use crate::twitter::TweetPage;

/// Tweet fields requested from the API and turned into columns.
pub const DEFAULT_TWEET_FIELDS: [&str; 12] = [
    "text",
    "attachments",
    "author_id",
    "context_annotations",
    "conversation_id",
    "created_at",
    "entities",
    "geo",
    "in_reply_to_user_id",
    "lang",
    "public_metrics",
    "referenced_tweets",
];

/// User fields requested alongside the `author_id` expansion.
pub const DEFAULT_USER_FIELDS: [&str; 2] = ["public_metrics", "verified"];

/// Owned copy of [`DEFAULT_TWEET_FIELDS`].
pub fn default_tweet_fields() -> Vec<String> {
    DEFAULT_TWEET_FIELDS.iter().map(|f| f.to_string()).collect()
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn extract_hashtags(entities: &Value) -> Field<Vec<String>> {
    entities
        .get("hashtags")
        .and_then(|hashtags| hashtags.as_array())
        .map(|hashtags| {
            hashtags
                .iter()
                .filter_map(|hashtag| hashtag.get("tag").and_then(|tag| tag.as_str()))
                .map(|tag| tag.to_string())
                .collect()
        })
        .into()
}

fn fan_out_metrics(public_metrics: &Value, metrics: &mut BTreeMap<String, Field<u64>>) {
    if let Some(map) = public_metrics.as_object() {
        for (name, value) in map {
            metrics.insert(name.clone(), value.as_u64().into());
        }
    }
}

/// Converts one raw tweet into a row.
///
/// Every name in `fields` ends up as a key on the record, holding either the
/// raw value or [`Field::Missing`]. `entities` additionally yields
/// `hashtags` and `public_metrics` is fanned out into one metric per key.
/// The author's follower count and verified flag are joined from `authors`.
///
/// # Errors
///
/// - [`Error::MissingAuthor`] if the tweet's `author_id` is absent or not in `authors`
/// - [`Error::UnexpectedResponse`] if the tweet has no string `id`
pub fn extract_record<S: AsRef<str>>(
    tweet: &Value,
    authors: &AuthorLookup,
    fields: &[S],
) -> Result<TweetRecord> {
    let id = tweet
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::UnexpectedResponse {
            operation: "extract_record".to_string(),
            reason: "tweet object without a string id".to_string(),
        })?
        .to_string();

    let mut record_fields = Vec::with_capacity(fields.len());
    let mut hashtags = Field::Missing;
    let mut metrics: BTreeMap<String, Field<u64>> = ENGAGEMENT_METRICS
        .iter()
        .map(|name| (name.to_string(), Field::Missing))
        .collect();

    for name in fields {
        let name = name.as_ref();
        match tweet.get(name).filter(|value| !is_empty_value(value)) {
            Some(value) => {
                match name {
                    "entities" => hashtags = extract_hashtags(value),
                    "public_metrics" => fan_out_metrics(value, &mut metrics),
                    _ => {}
                }
                record_fields.push((name.to_string(), Field::Present(value.clone())));
            }
            None => record_fields.push((name.to_string(), Field::Missing)),
        }
    }

    let author_id = tweet.get("author_id").and_then(|v| v.as_str());
    let author = author_id
        .and_then(|author_id| authors.get(author_id))
        .ok_or_else(|| Error::MissingAuthor {
            tweet_id: id.clone(),
            author_id: author_id.unwrap_or_default().to_string(),
        })?;

    Ok(TweetRecord {
        id,
        fields: record_fields,
        hashtags,
        metrics,
        followers_count: author.followers_count.clone(),
        verified: author.verified.clone(),
        total_engagements: None,
    })
}

/// Converts every tweet on a page, joining authors from the page's own
/// user data.
///
/// For a page of N tweets whose authors are all known this yields exactly N
/// records; the first tweet with an unknown author fails the whole page.
pub fn extract_page<S: AsRef<str>>(page: &TweetPage, fields: &[S]) -> Result<Vec<TweetRecord>> {
    debug!(
        "Extracting {} tweets with {} included authors",
        page.tweets.len(),
        page.authors.len()
    );

    page.tweets
        .iter()
        .map(|tweet| extract_record(tweet, &page.authors, fields))
        .collect()
}
