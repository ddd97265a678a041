//! # cite-core
//!
//! Core types, collaborator ports, and error types for Deepcite.
//!
//! This crate provides the foundational types shared across all Deepcite crates:
//! - Research data model (search results, pages, evidence, sources, drafts, critiques)
//! - Async ports for the external collaborators the research loop drives
//!   (planner, web search, page fetch, synthesizer, critic, embeddings)
//! - Cross-cutting error type returned by every port
//! - The terminal answer shape returned to callers

pub mod errors;
pub mod model;
pub mod ports;
pub mod responses;

pub use errors::CoreError;
pub use model::{Citation, Critique, Draft, EvidenceChunk, Page, SearchResult, Source};
pub use ports::{AnswerCritic, AnswerSynthesizer, Embedder, PageFetcher, QueryPlanner, WebSearch};
pub use responses::ResearchAnswer;
