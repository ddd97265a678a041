//! Minimal OpenAI-compatible HTTP client (chat completions and embeddings).

use std::time::Duration;

use cite_config::LlmConfig;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::LlmError;

/// Longest error body kept in [`LlmError::Api`].
const MAX_ERROR_BODY: usize = 300;

/// One JSON-mode chat turn: a system prompt and a user prompt.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub system: &'a str,
    pub user: &'a str,
    pub temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

/// Client for an OpenAI-compatible API (`/chat/completions`, `/embeddings`).
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    /// Build a client from the `[llm]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] when no key is configured, or
    /// [`LlmError::Http`] if the `reqwest::Client` fails to build.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        if !config.is_configured() {
            return Err(LlmError::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a JSON-mode chat completion and return the raw message content.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] on transport failure, a non-success status, or a
    /// response with no choices.
    pub async fn chat_json(&self, request: ChatRequest<'_>) -> Result<String, LlmError> {
        let body = json!({
            "model": request.model,
            "temperature": request.temperature,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
        });
        let value = self.post("chat/completions", &body).await?;
        let parsed: ChatResponse =
            serde_json::from_value(value).map_err(|e| LlmError::Response(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Response("no choices in response".into()))?
            .message
            .content
            .unwrap_or_default();
        tracing::debug!(model = request.model, chars = content.len(), "chat completion");
        Ok(content)
    }

    /// Embed `texts` with `model`, returning vectors in input order.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] on transport or status failure, or when the
    /// response does not carry exactly one vector per input.
    pub async fn embeddings(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let body = json!({ "model": model, "input": texts });
        let value = self.post("embeddings", &body).await?;
        let parsed: EmbeddingResponse =
            serde_json::from_value(value).map_err(|e| LlmError::Response(e.to_string()))?;
        order_embeddings(parsed, texts.len())
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, LlmError> {
        let url = format!("{}/{path}", self.base_url);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let text = resp.text().await.unwrap_or_default();
            return Err(map_http_error(status.as_u16(), retry_after, &text));
        }
        Ok(resp.json().await?)
    }
}

fn map_http_error(status: u16, retry_after: Option<u64>, body: &str) -> LlmError {
    match status {
        401 | 403 => {
            tracing::debug!(status, body, "authentication failed");
            LlmError::AuthFailed
        }
        429 => LlmError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(5),
        },
        _ => LlmError::Api {
            status,
            message: body.chars().take(MAX_ERROR_BODY).collect(),
        },
    }
}

fn order_embeddings(parsed: EmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>, LlmError> {
    let mut items = parsed.data;
    if items.len() != expected {
        return Err(LlmError::Response(format!(
            "expected {expected} embeddings, got {}",
            items.len()
        )));
    }
    items.sort_by_key(|item| item.index);
    Ok(items.into_iter().map(|item| item.embedding).collect())
}
