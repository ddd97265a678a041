//! Cited answer synthesis over JSON-mode chat.

use async_trait::async_trait;
use cite_core::{AnswerSynthesizer, Citation, CoreError, Draft, Source};
use serde::Deserialize;

use crate::client::{ChatRequest, OpenAiClient};
use crate::prompts::{SYNTHESIZER_SYSTEM, synthesizer_user};

#[derive(Deserialize)]
struct RawDraft {
    #[serde(default)]
    answer: String,
    #[serde(default)]
    citations: Vec<serde_json::Value>,
}

/// Parse the synthesizer's JSON. Malformed citation entries are skipped;
/// unparseable output yields an empty [`Draft`].
#[must_use]
pub fn parse_draft(raw: &str) -> Draft {
    let Ok(parsed) = serde_json::from_str::<RawDraft>(raw) else {
        tracing::warn!(raw, "synthesizer output unparseable");
        return Draft::default();
    };
    let citations = parsed
        .citations
        .into_iter()
        .filter_map(|c| serde_json::from_value::<Citation>(c).ok())
        .collect();
    Draft {
        answer: parsed.answer,
        citations,
    }
}

#[async_trait]
impl AnswerSynthesizer for OpenAiClient {
    async fn synthesize(
        &self,
        question: &str,
        sources: &[Source],
        model: &str,
    ) -> Result<Draft, CoreError> {
        let user = synthesizer_user(question, sources);
        let raw = self
            .chat_json(ChatRequest {
                model,
                system: SYNTHESIZER_SYSTEM,
                user: &user,
                temperature: 0.4,
            })
            .await?;
        Ok(parse_draft(&raw))
    }
}
