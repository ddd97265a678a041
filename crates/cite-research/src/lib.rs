//! # cite-research
//!
//! Iterative research loop for Deepcite.
//!
//! [`ResearchLoop::answer`] plans search queries, retrieves and filters
//! results, gathers evidence (search snippets in reduced mode, fetched and
//! BM25-ranked page chunks otherwise), selects domain-diverse sources,
//! synthesizes a cited answer, and asks a critic to score it. It re-plans
//! around the critic's gaps until confidence reaches the threshold or the
//! iteration budget is spent.

pub mod collaborators;
pub mod error;
pub mod events;
pub mod research_loop;

pub use collaborators::Collaborators;
pub use error::{ResearchError, Stage};
pub use events::{EventSink, NullSink, RecordingSink, RerankStage, ResearchEvent, TracingSink};
pub use research_loop::{DEFAULT_FOCUS, ResearchLoop, ResearchRequest};
