//! Error type shared by every tweetscope operation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a search, an export or the configuration load.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A tweet references an author that the page's `includes.users` did not carry.
    #[error("Author {author_id} of tweet {tweet_id} is missing from the page's user data")]
    MissingAuthor { tweet_id: String, author_id: String },

    /// The operator answered "n" at the large-request confirmation prompt.
    #[error("User stopped function.")]
    UserAborted,

    #[error("Could not parse date: {input:?}")]
    InvalidDate { input: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Twitter API error for operation '{operation}' ({status}): {message}")]
    Api {
        operation: String,
        status: u16,
        message: String,
    },

    #[error("Unexpected response for operation '{operation}': {reason}")]
    UnexpectedResponse { operation: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
