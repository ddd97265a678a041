//! # cite-search
//!
//! Evidence handling for the Deepcite research loop.
//!
//! - [`chunk`]: whitespace normalisation and overlapping character windows
//! - [`bm25`]: Okapi BM25 lexical relevance over a chunk list
//! - [`rerank`]: cosine-similarity re-ranking through the [`Embedder`](cite_core::Embedder) port
//! - [`dedup`]: url / domain deduplication and the non-HTML url heuristic
//! - [`select`]: domain-diverse, ID-labelled source selection

pub mod bm25;
pub mod chunk;
pub mod dedup;
pub mod error;
pub mod rerank;
pub mod select;

pub use bm25::{Bm25, rank_chunks};
pub use chunk::{chunk_text, normalize};
pub use dedup::{dedupe_by_domain, dedupe_by_key, domain, looks_like_pdf};
pub use error::SearchError;
pub use rerank::{cosine_similarity, rerank_by_embedding};
pub use select::select_sources;
