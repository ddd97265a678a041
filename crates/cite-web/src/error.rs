//! Web backend error types.

use cite_core::CoreError;
use thiserror::Error;

/// Errors from search backends, page fetching, and the response cache.
#[derive(Debug, Error)]
pub enum WebError {
    /// HTTP transport error (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, clipped.
        message: String,
    },

    /// The remote returned 429 Too Many Requests.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Failed to parse a backend response.
    #[error("parse error: {0}")]
    Parse(String),

    /// A configured search engine has no credential.
    #[error("{engine} API key not set")]
    MissingApiKey { engine: String },

    /// The configured search engine name is unknown.
    #[error("unsupported search engine: {0}")]
    UnsupportedEngine(String),

    /// The page is not HTML.
    #[error("non-HTML content-type: {0}")]
    UnsupportedContentType(String),

    /// The page body exceeds the configured cap.
    #[error("content exceeded cap ({limit} bytes)")]
    TooLarge { limit: usize },

    /// Cache directory could not be prepared.
    #[error("cache error: {0}")]
    Cache(#[from] std::io::Error),
}

impl WebError {
    /// Map to the port error for a search call. Missing credentials are fatal.
    #[must_use]
    pub fn into_search_error(self) -> CoreError {
        match self {
            Self::MissingApiKey { engine } => CoreError::NotConfigured {
                what: format!("{engine} API key"),
            },
            other => CoreError::Search(other.to_string()),
        }
    }

    /// Map to the port error for a fetch call.
    #[must_use]
    pub fn into_fetch_error(self) -> CoreError {
        CoreError::Fetch(self.to_string())
    }
}
