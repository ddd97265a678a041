//! Cross-cutting error types for Deepcite.
//!
//! Every collaborator port returns [`CoreError`]. Implementation crates keep
//! their own richer error enums (`WebError`, `LlmError`, ...) and convert at
//! the port boundary, so the research loop only ever sees this type.

use thiserror::Error;

/// Errors surfaced through the collaborator ports.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A backend credential or endpoint is missing. Fatal for the session.
    #[error("{what} is not configured")]
    NotConfigured { what: String },

    /// The web search backend failed.
    #[error("search failed: {0}")]
    Search(String),

    /// A page could not be fetched or its content was rejected.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The text-generation backend failed (transport, status, auth).
    #[error("generation failed: {0}")]
    Generation(String),

    /// The embedding backend failed or returned a malformed batch.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Whether this error means the session cannot proceed at all.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::NotConfigured { .. })
    }
}
