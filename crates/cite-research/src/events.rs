//! Structured diagnostic events emitted by the research loop.
//!
//! The loop never prints. It reports progress to an injected [`EventSink`],
//! which lets tests assert on what happened without capturing output.

use std::sync::Mutex;

/// Which optional re-ranking step was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RerankStage {
    Results,
    Chunks,
}

impl RerankStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Results => "results",
            Self::Chunks => "chunks",
        }
    }
}

/// One observable step of a research session. Iterations are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub enum ResearchEvent {
    IterationStarted {
        iteration: u32,
        max_iterations: u32,
    },
    QueriesPlanned {
        iteration: u32,
        queries: Vec<String>,
    },
    /// Search hits before and after url/pdf/domain filtering.
    ResultsFiltered {
        iteration: u32,
        retrieved: usize,
        kept: usize,
    },
    FetchFailed {
        url: String,
        error: String,
    },
    RerankSkipped {
        stage: RerankStage,
        reason: String,
    },
    /// Chunks added this iteration and pool size after capping.
    EvidencePooled {
        iteration: u32,
        added: usize,
        pooled: usize,
    },
    SourcesSelected {
        iteration: u32,
        count: usize,
    },
    /// A synthesizer citation that named no supplied source; it was dropped.
    DanglingCitation {
        id: String,
    },
    CritiqueReceived {
        iteration: u32,
        confidence: f64,
        gaps: usize,
    },
    Finished {
        iterations: u32,
        confidence: f64,
    },
}

/// Receiver for [`ResearchEvent`]s.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ResearchEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: ResearchEvent) {
        match event {
            ResearchEvent::IterationStarted {
                iteration,
                max_iterations,
            } => tracing::info!(iteration, max_iterations, "research iteration started"),
            ResearchEvent::QueriesPlanned { iteration, queries } => {
                tracing::debug!(iteration, ?queries, "queries planned");
            }
            ResearchEvent::ResultsFiltered {
                iteration,
                retrieved,
                kept,
            } => tracing::debug!(iteration, retrieved, kept, "search results filtered"),
            ResearchEvent::FetchFailed { url, error } => {
                tracing::warn!(%url, %error, "page fetch failed, skipping");
            }
            ResearchEvent::RerankSkipped { stage, reason } => {
                tracing::warn!(stage = stage.as_str(), %reason, "semantic rerank skipped");
            }
            ResearchEvent::EvidencePooled {
                iteration,
                added,
                pooled,
            } => tracing::debug!(iteration, added, pooled, "evidence pooled"),
            ResearchEvent::SourcesSelected { iteration, count } => {
                tracing::debug!(iteration, count, "sources selected");
            }
            ResearchEvent::DanglingCitation { id } => {
                tracing::warn!(%id, "dropping citation with unknown source id");
            }
            ResearchEvent::CritiqueReceived {
                iteration,
                confidence,
                gaps,
            } => tracing::info!(iteration, confidence, gaps, "critique received"),
            ResearchEvent::Finished {
                iterations,
                confidence,
            } => tracing::info!(iterations, confidence, "research finished"),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ResearchEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<ResearchEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: ResearchEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: ResearchEvent) {}
}
