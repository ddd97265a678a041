//! Research data model.
//!
//! All types are plain owned values. Evidence and sources live for one
//! research session; nothing here is persisted across sessions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single web search hit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    /// Empty when the backend returned no link; such results are dropped by dedup.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

/// Extracted readable content of a fetched page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub title: String,
    pub text: String,
}

/// A scored text fragment that may be cited.
///
/// Chunks from the same page share `url` and `title` but are scored
/// independently.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EvidenceChunk {
    pub chunk: String,
    pub url: String,
    pub score: f64,
    pub title: String,
}

/// An ID-labelled source shown to the generation collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Source {
    /// Sequential label: `S1`, `S2`, ...
    pub id: String,
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// A reference from an answer back to a [`Source`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Citation {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// One synthesized answer attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Draft {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// The critic's verdict on a draft.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Critique {
    /// In `[0, 1]`.
    pub confidence: f64,
    #[serde(default)]
    pub gaps: Vec<String>,
}

impl Critique {
    /// Neutral verdict used when the critic's output cannot be parsed.
    #[must_use]
    pub fn unparseable() -> Self {
        Self {
            confidence: 0.5,
            gaps: vec!["Could not parse critique.".to_string()],
        }
    }
}

impl Source {
    /// The citation that points at this source.
    #[must_use]
    pub fn citation(&self) -> Citation {
        Citation {
            id: self.id.clone(),
            url: self.url.clone(),
            title: self.title.clone(),
        }
    }
}
