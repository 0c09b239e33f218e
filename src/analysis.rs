//! Descriptive statistics over a tweet table: the word and hashtag counts a
//! word cloud is drawn from, and tweet counts over time.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::table::TweetTable;

/// Most words a word cloud shows.
pub const DEFAULT_WORD_LIMIT: usize = 100;

/// Common English words left out of keyword counts.
pub const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during",
    "each", "else", "ever", "few", "for", "from", "further", "get", "had", "has", "have",
    "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "however",
    "i", "if", "in", "into", "is", "it", "its", "itself", "just", "like", "me", "more", "most",
    "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other",
    "otherwise", "ought", "our", "ours", "ourselves", "out", "over", "own", "same", "shall",
    "she", "should", "since", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

fn tokens(table: &TweetTable) -> impl Iterator<Item = String> + '_ {
    table.iter().filter_map(|record| record.text()).flat_map(|text| {
        text.to_lowercase()
            .replace('\n', " ")
            .split(' ')
            .filter(|token| !token.is_empty())
            .map(String::from)
            .collect::<Vec<_>>()
    })
}

/// Lowercased query words with every non-word character removed.
fn query_stopwords(query: &str) -> HashSet<String> {
    let Ok(pattern) = Regex::new(r"[\W_]+") else {
        return HashSet::new();
    };

    query
        .to_lowercase()
        .split_whitespace()
        .map(|word| pattern.replace_all(word, "").into_owned())
        .filter(|word| !word.is_empty())
        .collect()
}

fn ranked(counts: HashMap<String, usize>, limit: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|(a_word, a_count), (b_word, b_count)| {
        b_count.cmp(a_count).then_with(|| a_word.cmp(b_word))
    });
    ranked.truncate(limit);
    ranked
}

/// Word counts across the table's `text` column.
///
/// Hashtags, mentions, links, `rt`, tokens that are not purely alphabetic
/// (after trimming surrounding punctuation), [`STOPWORDS`] and the words of
/// `query` are all skipped. Sorted by count, then alphabetically.
pub fn keyword_frequencies(
    table: &TweetTable,
    query: Option<&str>,
    limit: usize,
) -> Vec<(String, usize)> {
    let mut excluded: HashSet<String> = STOPWORDS.iter().map(|w| w.to_string()).collect();
    if let Some(query) = query {
        excluded.extend(query_stopwords(query));
    }

    let mut counts = HashMap::new();
    for token in tokens(table) {
        if token.starts_with('#') || token.starts_with('@') || token.starts_with("http") {
            continue;
        }

        let word = token.trim_matches(|c: char| !c.is_alphanumeric());
        if word.is_empty()
            || word == "rt"
            || !word.chars().all(char::is_alphabetic)
            || excluded.contains(word)
        {
            continue;
        }

        *counts.entry(word.to_string()).or_insert(0) += 1;
    }

    ranked(counts, limit)
}

/// Counts of `#`-prefixed tokens in the `text` column, lowercased.
pub fn hashtag_frequencies(table: &TweetTable, limit: usize) -> Vec<(String, usize)> {
    let mut counts = HashMap::new();
    for token in tokens(table) {
        if !token.starts_with('#') {
            continue;
        }
        let tag = token.trim_end_matches(|c: char| !(c.is_alphanumeric() || c == '_'));
        if tag.len() > 1 {
            *counts.entry(tag.to_string()).or_insert(0) += 1;
        }
    }

    ranked(counts, limit)
}

/// Bucket size of an attention series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Month,
    Year,
}

impl Granularity {
    /// First day of the bucket `date` falls in.
    pub fn bucket(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Month => date.with_day(1).unwrap_or(date),
            Granularity::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }

    /// Axis label for the bucket starting at `date`.
    pub fn label(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Day => date.format("%m-%d-%Y").to_string(),
            Granularity::Month => date.format("%b %Y").to_string(),
            Granularity::Year => date.format("%Y").to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::Month => write!(f, "month"),
            Granularity::Year => write!(f, "year"),
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Granularity::Day),
            "month" => Ok(Granularity::Month),
            "year" => Ok(Granularity::Year),
            other => Err(format!(
                "expected 'day', 'month', or 'year', found '{}'",
                other
            )),
        }
    }
}

/// Tweets per calendar day (UTC) of `created_at`.
///
/// Rows with a missing or unparsable timestamp are not counted.
pub fn daily_counts(table: &TweetTable) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for created_at in table.iter().filter_map(|record| record.created_at()) {
        *counts.entry(created_at.date_naive()).or_insert(0) += 1;
    }
    counts
}

/// Tweet counts over time for one labelled table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttentionSeries {
    pub label: String,
    pub granularity: Granularity,
    /// Count per bucket, keyed by the bucket's first day.
    pub counts: BTreeMap<NaiveDate, usize>,
}

impl AttentionSeries {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// `(bucket label, count)` pairs in chronological order.
    pub fn points(&self) -> Vec<(String, usize)> {
        self.counts
            .iter()
            .map(|(date, count)| (self.granularity.label(*date), *count))
            .collect()
    }
}

/// Builds one series per `(label, table)` pair, bucketing daily counts.
pub fn attention_series(
    tables: &[(&str, &TweetTable)],
    granularity: Granularity,
) -> Vec<AttentionSeries> {
    tables
        .iter()
        .map(|(label, table)| {
            let mut counts = BTreeMap::new();
            for (date, count) in daily_counts(table) {
                *counts.entry(granularity.bucket(date)).or_insert(0) += count;
            }
            AttentionSeries {
                label: label.to_string(),
                granularity,
                counts,
            }
        })
        .collect()
}
