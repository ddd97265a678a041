//! Query planning over JSON-mode chat.

use async_trait::async_trait;
use cite_core::{CoreError, QueryPlanner};

use crate::client::{ChatRequest, OpenAiClient};
use crate::prompts::{PLANNER_SYSTEM, planner_user};

/// Extract `queries` from the planner's JSON. Non-string and blank entries
/// are dropped; unparseable output yields `[prompt]`.
#[must_use]
pub fn parse_queries(raw: &str, prompt: &str) -> Vec<String> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => map
            .get("queries")
            .and_then(serde_json::Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(serde_json::Value::as_str)
                    .filter(|q| !q.trim().is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        _ => {
            tracing::warn!(raw, "planner output not a JSON object, using the prompt");
            vec![prompt.to_string()]
        }
    }
}

#[async_trait]
impl QueryPlanner for OpenAiClient {
    async fn plan(&self, prompt: &str, model: &str) -> Result<Vec<String>, CoreError> {
        let user = planner_user(prompt);
        let raw = self
            .chat_json(ChatRequest {
                model,
                system: PLANNER_SYSTEM,
                user: &user,
                temperature: 0.2,
            })
            .await?;
        Ok(parse_queries(&raw, prompt))
    }
}
