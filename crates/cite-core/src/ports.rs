//! Ports for the external collaborators driven by the research loop.
//!
//! Each port is an object-safe async trait so the loop can hold
//! `Arc<dyn Port>` and tests can substitute deterministic stubs. Generation
//! ports receive the model name chosen for the session.
//!
//! Contracts the implementations must honour:
//! - [`QueryPlanner::plan`] never fails on malformed model output; it returns
//!   `vec![prompt]` instead.
//! - [`AnswerSynthesizer::synthesize`] returns an empty [`Draft`] on parse failure.
//! - [`AnswerCritic::critique`] returns [`Critique::unparseable`] on parse failure.
//! - [`PageFetcher::fetch`] rejects non-text content, oversized bodies, and
//!   network failures with an error; the loop treats all of them alike.
//! - [`Embedder::embed`] returns one vector per input, in input order.

use async_trait::async_trait;

use crate::errors::CoreError;
use crate::model::{Critique, Draft, Page, SearchResult, Source};

/// Turns a question (optionally with a focus hint) into search queries.
#[async_trait]
pub trait QueryPlanner: Send + Sync {
    async fn plan(&self, prompt: &str, model: &str) -> Result<Vec<String>, CoreError>;
}

/// Web search backend.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Return at most `count` results for `query`.
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, CoreError>;
}

/// Page retrieval plus readable-text extraction.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page, CoreError>;
}

/// Writes a cited answer from ID-labelled sources.
#[async_trait]
pub trait AnswerSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        question: &str,
        sources: &[Source],
        model: &str,
    ) -> Result<Draft, CoreError>;
}

/// Scores an answer and lists what it is missing.
#[async_trait]
pub trait AnswerCritic: Send + Sync {
    async fn critique(&self, question: &str, answer: &str, model: &str)
    -> Result<Critique, CoreError>;
}

/// Text embedding backend.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CoreError>;
}
