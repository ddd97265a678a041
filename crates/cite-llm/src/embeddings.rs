//! Remote embeddings over the `/embeddings` endpoint.

use async_trait::async_trait;
use cite_core::{CoreError, Embedder};

use crate::client::OpenAiClient;

/// [`Embedder`] backed by an OpenAI-compatible embeddings endpoint.
pub struct RemoteEmbedder {
    client: OpenAiClient,
    model: String,
}

impl RemoteEmbedder {
    pub fn new(client: OpenAiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CoreError> {
        self.client
            .embeddings(&self.model, texts)
            .await
            .map_err(crate::LlmError::into_embedding_error)
    }
}
