//! # cite-embeddings
//!
//! Local embedding generation for Deepcite using fastembed (ONNX runtime).
//!
//! Produces 384-dimensional vectors for questions, search-result summaries,
//! and evidence chunks without any external API key. Used by the optional
//! semantic re-ranking steps of the research loop.
//!
//! ## Model
//!
//! Uses [`AllMiniLML6V2`](fastembed::EmbeddingModel::AllMiniLML6V2) (sentence-transformers/all-MiniLM-L6-v2):
//! - 384-dimensional output vectors
//! - Mean pooling (no query/passage prefix needed)
//! - ~80MB model size, cached at `~/.cache/deepcite/fastembed/`
//!
//! ## Async usage
//!
//! The fastembed ONNX runtime is synchronous. [`LocalEmbedder`] implements the
//! async [`Embedder`] port by moving each batch onto the blocking pool.

pub mod error;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cite_core::{CoreError, Embedder};
pub use error::EmbeddingError;
use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};

/// Local embedding engine backed by fastembed (ONNX runtime).
///
/// Model files are downloaded on first use.
///
/// # Thread safety
///
/// [`TextEmbedding::embed`] requires `&mut self`. Share through
/// [`LocalEmbedder`], which serialises access behind a mutex.
pub struct EmbeddingEngine {
    model: TextEmbedding,
}

impl EmbeddingEngine {
    /// Create a new embedding engine with the `AllMiniLML6V2` model.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::InitFailed`] if model download or ONNX initialization fails.
    pub fn new() -> Result<Self, EmbeddingError> {
        let cache_dir = dirs::cache_dir().map_or_else(
            || std::path::PathBuf::from(".fastembed_cache"),
            |c| c.join("deepcite").join("fastembed"),
        );

        let model = TextEmbedding::try_new(
            TextInitOptions::new(EmbeddingModel::AllMiniLML6V2)
                .with_cache_dir(cache_dir)
                .with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;

        Ok(Self { model })
    }

    /// Embed a batch of texts. Returns one 384-dim vector per input.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::EmbedFailed`] if the ONNX inference fails.
    pub fn embed_batch(&mut self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.model
            .embed(texts, None)
            .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))
    }

    /// Embed a single text. Returns a 384-dim vector.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::EmbedFailed`] if inference fails, or
    /// [`EmbeddingError::EmptyResult`] if the model returns no embeddings.
    pub fn embed_single(&mut self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut results = self.embed_batch(vec![text.to_string()])?;
        results.pop().ok_or(EmbeddingError::EmptyResult)
    }

    /// Embedding vector dimensionality (always 384 for `AllMiniLML6V2`).
    #[must_use]
    pub const fn dimension() -> usize {
        384
    }
}

/// Shareable [`Embedder`] over a local [`EmbeddingEngine`].
#[derive(Clone)]
pub struct LocalEmbedder {
    engine: Arc<Mutex<EmbeddingEngine>>,
}

impl LocalEmbedder {
    #[must_use]
    pub fn new(engine: EmbeddingEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Load the default model.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::InitFailed`] if the model cannot be loaded.
    pub fn load() -> Result<Self, EmbeddingError> {
        EmbeddingEngine::new().map(Self::new)
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CoreError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let engine = Arc::clone(&self.engine);
        let batch = texts.to_vec();
        let vectors = tokio::task::spawn_blocking(move || {
            let mut guard = engine
                .lock()
                .map_err(|e| EmbeddingError::TaskFailed(e.to_string()))?;
            guard.embed_batch(batch)
        })
        .await
        .map_err(|e| EmbeddingError::TaskFailed(e.to_string()))??;
        tracing::debug!(count = vectors.len(), "local embeddings computed");
        Ok(vectors)
    }
}
