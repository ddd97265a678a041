//! Embedding provider selection.

use serde::{Deserialize, Serialize};

/// Where query/passage embeddings come from.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// fastembed (ONNX) on this machine.
    #[default]
    Local,
    /// The configured LLM API's embeddings endpoint.
    Remote,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct EmbeddingsConfig {
    #[serde(default)]
    pub provider: EmbeddingProvider,
}
