//! Row-level data model: one flattened tweet plus the author data joined onto it.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// The four engagement counters every row carries, in column order.
pub const ENGAGEMENT_METRICS: [&str; 4] =
    ["retweet_count", "reply_count", "like_count", "quote_count"];

/// A value that was either found on the source object or recorded as missing.
///
/// Records never drop a requested key; a field the API did not return (or
/// returned empty) is kept as [`Field::Missing`] so every row shares one
/// column set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field<T> {
    Missing,
    Present(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Missing
    }
}

impl<T> Field<T> {
    /// Borrows the value if it is present.
    pub fn present(&self) -> Option<&T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Missing => None,
        }
    }

    /// Returns `true` for [`Field::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    /// Converts a present value, keeping the missing marker as is.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Field<U> {
        match self {
            Field::Present(value) => Field::Present(f(value)),
            Field::Missing => Field::Missing,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Field::Missing, Field::Present)
    }
}

/// Author-level columns joined onto each tweet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorMetrics {
    pub followers_count: Field<u64>,
    pub verified: Field<bool>,
}

impl AuthorMetrics {
    /// Reads `public_metrics.followers_count` and `verified` off a v2 user object.
    pub fn from_user(user: &Value) -> Self {
        Self {
            followers_count: user
                .get("public_metrics")
                .and_then(|pm| pm.get("followers_count"))
                .and_then(|v| v.as_u64())
                .into(),
            verified: user.get("verified").and_then(|v| v.as_bool()).into(),
        }
    }
}

/// Author metrics for one page, keyed by user id.
#[derive(Clone, Debug, Default)]
pub struct AuthorLookup {
    authors: HashMap<String, AuthorMetrics>,
}

impl AuthorLookup {
    /// Builds the lookup from a response's `includes.users` array.
    ///
    /// Users without a string `id` are ignored; a response without
    /// `includes.users` yields an empty lookup.
    pub fn from_response(response: &Value) -> Self {
        let authors = response
            .get("includes")
            .and_then(|includes| includes.get("users"))
            .and_then(|users| users.as_array())
            .map(|users| {
                users
                    .iter()
                    .filter_map(|user| {
                        let id = user.get("id").and_then(|v| v.as_str())?;
                        Some((id.to_string(), AuthorMetrics::from_user(user)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { authors }
    }

    /// Registers (or replaces) the metrics of one author.
    pub fn insert(&mut self, author_id: impl Into<String>, metrics: AuthorMetrics) {
        self.authors.insert(author_id.into(), metrics);
    }

    /// Looks up an author by user id.
    ///
    /// # Parameters
    ///
    /// - `author_id`: The `author_id` carried by a tweet
    ///
    /// # Returns
    ///
    /// The author's metrics, or `None` if the page did not include that user.
    pub fn get(&self, author_id: &str) -> Option<&AuthorMetrics> {
        self.authors.get(author_id)
    }

    /// Number of distinct authors held.
    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}

/// One row of the output table.
#[derive(Clone, Debug, PartialEq)]
pub struct TweetRecord {
    pub id: String,
    /// Requested tweet fields, in request order.
    pub fields: Vec<(String, Field<Value>)>,
    /// Tags derived from `entities.hashtags`.
    pub hashtags: Field<Vec<String>>,
    /// Sub-metrics fanned out of `public_metrics`. Always holds the four
    /// [`ENGAGEMENT_METRICS`] keys.
    pub metrics: BTreeMap<String, Field<u64>>,
    pub followers_count: Field<u64>,
    pub verified: Field<bool>,
    /// Set once the table holding this record has been normalized.
    pub total_engagements: Option<u64>,
}

impl TweetRecord {
    /// The value stored under a requested field name.
    ///
    /// # Returns
    ///
    /// - `Some(Field::Present(_))`: The API returned a non-empty value
    /// - `Some(Field::Missing)`: The field was requested but absent or empty
    /// - `None`: The field was never requested (or was dropped by normalization)
    pub fn field(&self, name: &str) -> Option<&Field<Value>> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Returns `true` if `name` is one of the row's field keys.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// The tweet text, if present.
    pub fn text(&self) -> Option<&str> {
        self.field("text")
            .and_then(|value| value.present())
            .and_then(|value| value.as_str())
    }

    pub fn author_id(&self) -> Option<&str> {
        self.field("author_id")
            .and_then(|value| value.present())
            .and_then(|value| value.as_str())
    }

    pub fn lang(&self) -> Option<&str> {
        self.field("lang")
            .and_then(|value| value.present())
            .and_then(|value| value.as_str())
    }

    /// Parses `created_at`; `None` if it is missing or not RFC 3339.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self
            .field("created_at")
            .and_then(|value| value.present())
            .and_then(|value| value.as_str())?;

        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// A fanned-out `public_metrics` counter; missing if the tweet did not carry it.
    pub fn metric(&self, name: &str) -> Field<u64> {
        self.metrics.get(name).cloned().unwrap_or_default()
    }

    /// Sum of the four engagement counters; missing counters contribute zero.
    pub fn engagement_sum(&self) -> u64 {
        ENGAGEMENT_METRICS
            .iter()
            .filter_map(|name| self.metric(name).present().copied())
            .sum()
    }

    pub(crate) fn remove_field(&mut self, name: &str) {
        self.fields.retain(|(key, _)| key != name);
    }
}
