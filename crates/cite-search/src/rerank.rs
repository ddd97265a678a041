//! Semantic re-ranking by embedding cosine similarity.

use cite_core::Embedder;

use crate::error::SearchError;

/// Cosine similarity of two vectors.
///
/// Zero when either vector has zero norm or the dimensions differ.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Order `texts` by similarity to `query`, returning `(index, similarity)`
/// for the best `top_n`.
///
/// Makes two embedding calls: one for the query and one batched call over all
/// texts. Ties keep input order.
///
/// # Errors
///
/// Returns [`SearchError::Embedding`] if the embedder fails, or
/// [`SearchError::EmbeddingCount`] if it returns the wrong number of vectors.
pub async fn rerank_by_embedding(
    embedder: &dyn Embedder,
    query: &str,
    texts: &[String],
    top_n: usize,
) -> Result<Vec<(usize, f32)>, SearchError> {
    if texts.is_empty() || top_n == 0 {
        return Ok(Vec::new());
    }

    let query_vecs = embedder.embed(&[query.to_string()]).await?;
    let [query_vec] = query_vecs.as_slice() else {
        return Err(SearchError::EmbeddingCount {
            expected: 1,
            got: query_vecs.len(),
        });
    };

    let text_vecs = embedder.embed(texts).await?;
    if text_vecs.len() != texts.len() {
        return Err(SearchError::EmbeddingCount {
            expected: texts.len(),
            got: text_vecs.len(),
        });
    }

    let mut scored: Vec<(usize, f32)> = text_vecs
        .iter()
        .enumerate()
        .map(|(i, v)| (i, cosine_similarity(query_vec, v)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_n);

    tracing::debug!(candidates = texts.len(), kept = scored.len(), "semantic rerank");
    Ok(scored)
}
