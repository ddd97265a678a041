//! Terminal result returned by the research loop and printed by `dcite ask`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::Citation;

/// Placeholder answer when the loop never produced a draft.
pub const FALLBACK_ANSWER: &str = "Unable to reach high confidence.";

/// Final answer of a research session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ResearchAnswer {
    pub answer: String,
    pub citations: Vec<Citation>,
    /// Critic confidence of the returned draft; `>= 0.75` means a strong synthesis.
    pub confidence: f64,
    pub gaps: Vec<String>,
}

impl ResearchAnswer {
    /// Fixed low-confidence placeholder for degenerate runs.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            answer: FALLBACK_ANSWER.to_string(),
            citations: Vec::new(),
            confidence: 0.5,
            gaps: Vec::new(),
        }
    }
}
