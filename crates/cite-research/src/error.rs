//! Research loop error types.

use std::fmt;

use cite_config::ConfigError;
use cite_core::CoreError;
use thiserror::Error;

/// Loop step whose collaborator failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Plan,
    Search,
    Synthesize,
    Critique,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plan => "query planning",
            Self::Search => "web search",
            Self::Synthesize => "synthesis",
            Self::Critique => "critique",
        })
    }
}

/// Errors that end a research session without an answer.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// A planner, search, synthesizer or critic call failed.
    #[error("{stage} failed: {source}")]
    Collaborator {
        stage: Stage,
        #[source]
        source: CoreError,
    },

    /// Loop tunables are inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ResearchError {
    pub(crate) fn at(stage: Stage) -> impl Fn(CoreError) -> Self {
        move |source| Self::Collaborator { stage, source }
    }

    /// True when the session failed for lack of credentials or settings.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        match self {
            Self::Collaborator { source, .. } => source.is_configuration(),
            Self::Config(_) => true,
        }
    }
}
