//! Answer critique over JSON-mode chat.

use async_trait::async_trait;
use cite_core::{AnswerCritic, CoreError, Critique};
use serde_json::Value;

use crate::client::{ChatRequest, OpenAiClient};
use crate::prompts::{CRITIC_SYSTEM, critic_user};

/// Parse the critic's JSON.
///
/// Confidence may arrive as a number or numeric string and is clamped to
/// `[0, 1]`; a missing confidence counts as `0.0`. Non-object output yields
/// [`Critique::unparseable`].
#[must_use]
pub fn parse_critique(raw: &str) -> Critique {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) else {
        tracing::warn!(raw, "critic output unparseable");
        return Critique::unparseable();
    };
    let confidence = match map.get("confidence") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let confidence = match confidence {
        Some(c) if c.is_finite() => c.clamp(0.0, 1.0),
        Some(_) => return Critique::unparseable(),
        None => 0.0,
    };
    let gaps = map
        .get("gaps")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|g| !g.trim().is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Critique { confidence, gaps }
}

#[async_trait]
impl AnswerCritic for OpenAiClient {
    async fn critique(
        &self,
        question: &str,
        answer: &str,
        model: &str,
    ) -> Result<Critique, CoreError> {
        let user = critic_user(question, answer);
        let raw = self
            .chat_json(ChatRequest {
                model,
                system: CRITIC_SYSTEM,
                user: &user,
                temperature: 0.0,
            })
            .await?;
        Ok(parse_critique(&raw))
    }
}
