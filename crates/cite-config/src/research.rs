//! Research loop configuration.
//!
//! This section is handed to the loop constructor as-is; the loop never reads
//! the environment itself.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_max_iterations() -> u32 {
    2
}
const fn default_results_per_query() -> usize {
    6
}
fn default_model() -> String {
    String::from("gpt-4o-mini")
}
const fn default_max_queries() -> usize {
    6
}
const fn default_reduced_results() -> usize {
    10
}
const fn default_snippet_chars() -> usize {
    1000
}
const fn default_max_pages() -> usize {
    8
}
const fn default_chunk_window() -> usize {
    900
}
const fn default_chunk_overlap() -> usize {
    120
}
const fn default_chunks_per_page() -> usize {
    2
}
const fn default_evidence_cap() -> usize {
    24
}
const fn default_max_sources() -> usize {
    8
}
const fn default_confidence_threshold() -> f64 {
    0.75
}
const fn default_fetch_concurrency() -> usize {
    4
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ResearchConfig {
    /// Iteration budget per question.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Results requested from the search backend per query.
    #[serde(default = "default_results_per_query")]
    pub results_per_query: usize,

    /// Generation model. `provider:model` is accepted and normalised.
    #[serde(default = "default_model")]
    pub model: String,

    /// Answer from search snippets only, never fetching pages.
    #[serde(default)]
    pub reduced_fetch: bool,

    /// Reorder filtered search results by embedding similarity before fetching.
    #[serde(default)]
    pub rerank_results: bool,

    /// Filter the evidence pool by embedding similarity after lexical ranking.
    #[serde(default)]
    pub rerank_chunks: bool,

    /// Upper bound on planner queries searched per iteration.
    #[serde(default = "default_max_queries")]
    pub max_queries: usize,

    /// Results turned into evidence in reduced-fetch mode.
    #[serde(default = "default_reduced_results")]
    pub reduced_results: usize,

    /// Snippet truncation (characters) in reduced-fetch mode.
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,

    /// Page fetch attempts per iteration.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    #[serde(default = "default_chunk_window")]
    pub chunk_window: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Best chunks kept per fetched page.
    #[serde(default = "default_chunks_per_page")]
    pub chunks_per_page: usize,

    /// Evidence pool size after every iteration.
    #[serde(default = "default_evidence_cap")]
    pub evidence_cap: usize,

    /// Sources handed to the synthesizer.
    #[serde(default = "default_max_sources")]
    pub max_sources: usize,

    /// Critique confidence that ends the loop early.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Concurrent page fetches within one iteration.
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            results_per_query: default_results_per_query(),
            model: default_model(),
            reduced_fetch: false,
            rerank_results: false,
            rerank_chunks: false,
            max_queries: default_max_queries(),
            reduced_results: default_reduced_results(),
            snippet_chars: default_snippet_chars(),
            max_pages: default_max_pages(),
            chunk_window: default_chunk_window(),
            chunk_overlap: default_chunk_overlap(),
            chunks_per_page: default_chunks_per_page(),
            evidence_cap: default_evidence_cap(),
            max_sources: default_max_sources(),
            confidence_threshold: default_confidence_threshold(),
            fetch_concurrency: default_fetch_concurrency(),
        }
    }
}

impl ResearchConfig {
    /// Strip an optional `provider:` prefix from a model name.
    #[must_use]
    pub fn normalize_model(model: &str) -> &str {
        model.split_once(':').map_or(model, |(_, name)| name)
    }

    /// The configured model with any provider prefix removed.
    #[must_use]
    pub fn model_name(&self) -> &str {
        Self::normalize_model(&self.model)
    }

    /// Reject tunables that would make chunking or selection degenerate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_window == 0 {
            return Err(invalid("research.chunk_window", "must be greater than zero"));
        }
        if self.chunk_overlap >= self.chunk_window {
            return Err(invalid(
                "research.chunk_overlap",
                "must be smaller than research.chunk_window",
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(invalid("research.confidence_threshold", "must be within [0, 1]"));
        }
        if self.fetch_concurrency == 0 {
            return Err(invalid("research.fetch_concurrency", "must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
