//! # cite-llm
//!
//! OpenAI-compatible generation backend for Deepcite.
//!
//! A single [`OpenAiClient`] implements the [`QueryPlanner`], [`AnswerSynthesizer`]
//! and [`AnswerCritic`] ports. Each port absorbs malformed model output into
//! its documented fallback; only transport, status and credential failures
//! surface as errors. [`RemoteEmbedder`] reuses the same client for the
//! embeddings endpoint.
//!
//! [`QueryPlanner`]: cite_core::QueryPlanner
//! [`AnswerSynthesizer`]: cite_core::AnswerSynthesizer
//! [`AnswerCritic`]: cite_core::AnswerCritic

pub mod client;
pub mod critic;
pub mod embeddings;
pub mod planner;
pub mod prompts;
pub mod synthesizer;

mod error;

pub use client::{ChatRequest, OpenAiClient};
pub use critic::parse_critique;
pub use embeddings::RemoteEmbedder;
pub use error::LlmError;
pub use planner::parse_queries;
pub use synthesizer::parse_draft;
