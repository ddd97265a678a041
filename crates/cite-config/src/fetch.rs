//! Page fetch configuration.

use serde::{Deserialize, Serialize};

/// ~1.5 MB body cap.
const fn default_max_bytes() -> usize {
    1_500_000
}

const fn default_timeout_secs() -> u64 {
    45
}

fn default_user_agent() -> String {
    String::from("Mozilla/5.0 (compatible; Deepcite/0.1; +https://example.org/bot)")
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FetchConfig {
    /// Largest HTML body accepted, in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}
