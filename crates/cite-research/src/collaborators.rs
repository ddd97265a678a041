//! The set of external capabilities a research session drives.

use std::sync::Arc;

use cite_core::{AnswerCritic, AnswerSynthesizer, Embedder, PageFetcher, QueryPlanner, WebSearch};

/// Shared handles to every port the loop calls.
///
/// `embedder` is only consulted when one of the semantic re-rank steps is
/// enabled; without it those steps are skipped.
#[derive(Clone)]
pub struct Collaborators {
    pub planner: Arc<dyn QueryPlanner>,
    pub search: Arc<dyn WebSearch>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub synthesizer: Arc<dyn AnswerSynthesizer>,
    pub critic: Arc<dyn AnswerCritic>,
    pub embedder: Option<Arc<dyn Embedder>>,
}

impl Collaborators {
    #[must_use]
    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }
}
