//! Text-generation backend configuration (OpenAI-compatible API).

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    String::from("https://api.openai.com/v1")
}

const fn default_timeout_secs() -> u64 {
    120
}

fn default_embedding_model() -> String {
    String::from("text-embedding-3-small")
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LlmConfig {
    /// API key (also read from `OPENAI_API_KEY`).
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the chat/embeddings API, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Model used by the remote embeddings provider.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            embedding_model: default_embedding_model(),
        }
    }
}

impl LlmConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}
