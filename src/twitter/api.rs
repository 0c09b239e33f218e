//! HTTP implementation of [`SearchClient`] on top of reqwest.
//!
//! Every call goes through [`HttpSearchClient::get_json`], which waits out
//! rate limiting (HTTP 429) instead of failing, so a long search simply blocks
//! until the API has capacity again.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::config::TwitterConfig;
use crate::error::{Error, Result};
use crate::extract::DEFAULT_USER_FIELDS;

use super::client::{ArchiveRequest, IdPage, RecentRequest, SearchClient, TweetPage};

/// How long to wait on a 429 that carries no usable reset header.
const RATE_LIMIT_FALLBACK_WAIT: Duration = Duration::from_secs(15 * 60);

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_len`: Maximum length in characters before truncation
///
/// # Returns
///
/// A sanitized string safe for logging
pub(crate) fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_len {
        let truncated: String = sanitized.chars().take(max_len).collect();
        format!(
            "{}... [truncated, {} total bytes]",
            truncated,
            text.len()
        )
    } else {
        sanitized
    }
}

/// Builds the Authorization header value for app-only Bearer Token authentication.
pub fn build_bearer_auth_header(bearer_token: &str) -> String {
    format!("Bearer {}", bearer_token)
}

/// Joins query parameters into `k=v&k=v`, percent-encoding every value.
pub(crate) fn encode_query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Seconds until the `x-rate-limit-reset` epoch carried by a 429 response.
fn rate_limit_wait(headers: &reqwest::header::HeaderMap) -> Duration {
    headers
        .get("x-rate-limit-reset")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i64>().ok())
        .map(|reset| {
            let seconds = (reset - Utc::now().timestamp()).max(1);
            Duration::from_secs(seconds as u64)
        })
        .unwrap_or(RATE_LIMIT_FALLBACK_WAIT)
}

/// reqwest-backed client for the recent search, the premium searches and
/// the v2 tweet lookup.
pub struct HttpSearchClient {
    client: Client,
    config: TwitterConfig,
}

impl HttpSearchClient {
    pub fn new(config: TwitterConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &TwitterConfig {
        &self.config
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        format!("{}{}?{}", self.config.api_base, path, encode_query(params))
    }

    /// Sends a GET request and parses the JSON body, blocking through rate limits.
    ///
    /// # Parameters
    ///
    /// - `url`: Fully built request URL
    /// - `operation_name`: Human-readable name for the operation (for logging)
    ///
    /// # Returns
    ///
    /// - `Ok(Value)`: The parsed response body on success
    /// - `Err(Error::Api)`: For any non-success status other than 429
    pub(crate) async fn get_json(
        &self,
        url: &str,
        operation_name: &str,
    ) -> Result<serde_json::Value> {
        let auth_header = build_bearer_auth_header(&self.config.bearer_token);

        loop {
            info!("Sending GET request for operation: {}", operation_name);
            debug!("Request URL: {}", url);
            debug!("Request headers: Authorization: Bearer [REDACTED]");

            let response = self
                .client
                .get(url)
                .header("Authorization", auth_header.as_str())
                .send()
                .await?;

            let status = response.status();
            info!(
                "Received response with status: {} for operation: {}",
                status, operation_name
            );

            if status.is_success() {
                let response_text = response.text().await?;
                debug!(
                    "Response summary for '{}': {} bytes received",
                    operation_name,
                    response_text.len()
                );
                return Ok(serde_json::from_str(&response_text)?);
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let wait = rate_limit_wait(response.headers());
                warn!(
                    "Rate limited on operation '{}', waiting {} seconds before retrying",
                    operation_name,
                    wait.as_secs()
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            let error_text = response.text().await?;
            error!("Operation '{}' failed - Status: {}", operation_name, status);
            debug!(
                "Error response for '{}': {}",
                operation_name,
                sanitize_for_logging(&error_text, 200)
            );
            return Err(Error::Api {
                operation: operation_name.to_string(),
                status: status.as_u16(),
                message: sanitize_for_logging(&error_text, 200),
            });
        }
    }
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn fetch_recent(&self, request: &RecentRequest) -> Result<TweetPage> {
        let mut params = vec![
            ("query", request.query.clone()),
            ("max_results", request.max_results.to_string()),
            ("tweet.fields", request.tweet_fields.join(",")),
            ("expansions", "author_id".to_string()),
            ("user.fields", DEFAULT_USER_FIELDS.join(",")),
        ];
        params.extend(request.window.recent_params());
        if let Some(token) = &request.next_token {
            params.push(("next_token", token.clone()));
        }

        let url = self.url("/2/tweets/search/recent", &params);
        let json_response = self.get_json(&url, "search_recent").await?;
        TweetPage::from_response(&json_response, "search_recent")
    }

    async fn fetch_ids_by_window(&self, request: &ArchiveRequest) -> Result<IdPage> {
        let label = match request.archive {
            super::Archive::ThirtyDay => &self.config.thirty_day_label,
            super::Archive::FullArchive => &self.config.full_archive_label,
        };
        let path = format!(
            "/1.1/tweets/search/{}/{}.json",
            request.archive.name(),
            label
        );

        let mut params = vec![
            ("query", request.query.clone()),
            ("maxResults", request.max_results.to_string()),
        ];
        params.extend(request.window.premium_params());
        if let Some(next) = &request.next {
            params.push(("next", next.clone()));
        }

        let operation = format!("search_{}", request.archive.name());
        let url = self.url(&path, &params);
        let json_response = self.get_json(&url, &operation).await?;
        IdPage::from_response(&json_response, &operation)
    }

    async fn fetch_by_ids(&self, ids: &[String], tweet_fields: &[String]) -> Result<TweetPage> {
        let params = vec![
            ("ids", ids.join(",")),
            ("tweet.fields", tweet_fields.join(",")),
            ("expansions", "author_id".to_string()),
            ("user.fields", DEFAULT_USER_FIELDS.join(",")),
        ];

        let url = self.url("/2/tweets", &params);
        let json_response = self.get_json(&url, "lookup_tweets").await?;
        TweetPage::from_response(&json_response, "lookup_tweets")
    }
}
