//! Configuration module for tweetscope.
//!
//! This module contains the configuration structure and environment variable
//! handling for the Twitter/X search API integration.

use log::{debug, error, info, warn};
use std::env;

use crate::error::{Error, Result};

/// Default API host; overridable with `TWITTER_API_BASE`.
pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";

/// Default dev-environment label of the premium 30-day search.
pub const DEFAULT_THIRTY_DAY_LABEL: &str = "30day";

/// Default dev-environment label of the premium full-archive search.
pub const DEFAULT_FULL_ARCHIVE_LABEL: &str = "full";

/// Configuration struct for Twitter/X API access.
///
/// All three search endpoints and the tweet lookup endpoint are called with the
/// app's Bearer Token. The premium searches additionally need the label of the
/// dev environment configured in the developer portal.
#[derive(Clone, Debug)]
pub struct TwitterConfig {
    /// The app Bearer Token (OAuth 2.0 app-only authentication)
    pub bearer_token: String,
    /// Scheme and host of the API, without a trailing slash
    pub api_base: String,
    /// Dev-environment label for `/1.1/tweets/search/30day/{label}.json`
    pub thirty_day_label: String,
    /// Dev-environment label for `/1.1/tweets/search/fullarchive/{label}.json`
    pub full_archive_label: String,
}

/// Masks a secret for logging, keeping at most eight leading and trailing characters.
pub(crate) fn mask_token(token: &str) -> String {
    let token_length = token.chars().count();
    let prefix: String = token.chars().take(8).collect();

    if token_length > 16 {
        let suffix: String = token.chars().skip(token_length - 8).collect();
        format!("{}...{}", prefix, suffix)
    } else {
        format!("{}...", prefix)
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            info!("Found {} environment variable", name);
            value.trim().to_string()
        }
        _ => {
            debug!("No {} set, using default '{}'", name, default);
            default.to_string()
        }
    }
}

impl TwitterConfig {
    /// Creates a configuration with the default API base and environment labels.
    pub fn new(bearer_token: impl Into<String>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            thirty_day_label: DEFAULT_THIRTY_DAY_LABEL.to_string(),
            full_archive_label: DEFAULT_FULL_ARCHIVE_LABEL.to_string(),
        }
    }

    /// Creates a new `TwitterConfig` instance by loading settings from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `BEARER_TOKEN`: Twitter API app Bearer Token
    ///
    /// # Optional Environment Variables
    ///
    /// - `TWITTER_API_BASE`: API host (defaults to `https://api.twitter.com`)
    /// - `TWITTER_30DAY_LABEL`: premium 30-day dev environment label (defaults to `30day`)
    /// - `TWITTER_FULLARCHIVE_LABEL`: premium full-archive dev environment label (defaults to `full`)
    ///
    /// # Returns
    ///
    /// - `Ok(TwitterConfig)`: If the required environment variable is present
    /// - `Err(Error::Config)`: If the Bearer Token is missing or empty
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use tweetscope::TwitterConfig;
    ///
    /// std::env::set_var("BEARER_TOKEN", "your_bearer_token");
    /// let config = TwitterConfig::from_env().unwrap();
    /// assert_eq!(config.thirty_day_label, "30day");
    /// ```
    pub fn from_env() -> Result<Self> {
        info!("Loading Twitter configuration from environment variables");

        let bearer_token = match env::var("BEARER_TOKEN") {
            Ok(token) => {
                let token = token.trim().to_string();
                info!(
                    "Found BEARER_TOKEN environment variable with length: {}",
                    token.len()
                );
                debug!("Bearer token (masked): {}", mask_token(&token));

                if token.is_empty() {
                    error!("Bearer token is empty");
                    return Err(Error::Config("BEARER_TOKEN cannot be empty".to_string()));
                }

                if token.len() < 10 {
                    warn!(
                        "Bearer token seems unusually short ({} characters)",
                        token.len()
                    );
                }

                token
            }
            Err(e) => {
                error!("Failed to load BEARER_TOKEN from environment: {}", e);
                return Err(Error::Config(format!(
                    "Missing BEARER_TOKEN environment variable: {}",
                    e
                )));
            }
        };

        let api_base = env_or_default("TWITTER_API_BASE", DEFAULT_API_BASE)
            .trim_end_matches('/')
            .to_string();

        let config = TwitterConfig {
            bearer_token,
            api_base,
            thirty_day_label: env_or_default("TWITTER_30DAY_LABEL", DEFAULT_THIRTY_DAY_LABEL),
            full_archive_label: env_or_default(
                "TWITTER_FULLARCHIVE_LABEL",
                DEFAULT_FULL_ARCHIVE_LABEL,
            ),
        };

        info!(
            "Twitter configuration loaded successfully (api base: {})",
            config.api_base
        );
        Ok(config)
    }
}
