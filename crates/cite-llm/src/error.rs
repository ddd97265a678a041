//! Generation backend error types.

use cite_core::CoreError;
use thiserror::Error;

/// Errors from the OpenAI-compatible API client.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the credential.
    #[error("authentication failed")]
    AuthFailed,

    /// The API returned 429 Too Many Requests.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Any other non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response envelope did not have the expected shape.
    #[error("unexpected response: {0}")]
    Response(String),

    /// No API key configured.
    #[error("llm.api_key not set")]
    MissingApiKey,
}

impl LlmError {
    /// Map to the port error for an embeddings call.
    #[must_use]
    pub fn into_embedding_error(self) -> CoreError {
        match self {
            Self::MissingApiKey => missing_key(),
            other => CoreError::Embedding(other.to_string()),
        }
    }
}

impl From<LlmError> for CoreError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => missing_key(),
            other => Self::Generation(other.to_string()),
        }
    }
}

fn missing_key() -> CoreError {
    CoreError::NotConfigured {
        what: "llm.api_key (or OPENAI_API_KEY)".to_string(),
    }
}
