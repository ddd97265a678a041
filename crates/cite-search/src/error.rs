//! Search error types for cite-search.

/// Errors from ranking operations that call out to collaborators.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The embedding collaborator failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] cite_core::CoreError),

    /// The embedding collaborator returned the wrong number of vectors.
    #[error("embedding batch mismatch: expected {expected} vectors, got {got}")]
    EmbeddingCount { expected: usize, got: usize },
}
