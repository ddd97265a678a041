//! Web search backend configuration.

use serde::{Deserialize, Serialize};

fn default_engines() -> Vec<String> {
    vec![String::from("serpapi")]
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Search backends queried per query, in result-concatenation order.
    /// Known values: `serpapi` (alias `google`) and `brave`, case-insensitive.
    #[serde(default = "default_engines")]
    pub engines: Vec<String>,

    /// SerpAPI key (also read from `SERPAPI_KEY`).
    #[serde(default)]
    pub serpapi_key: String,

    /// Brave Search subscription token (also read from `BRAVE_API_KEY`).
    #[serde(default)]
    pub brave_key: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engines: default_engines(),
            serpapi_key: String::new(),
            brave_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SearchConfig {
    /// At least one configured engine has its credential.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.engines.iter().any(|engine| self.has_key_for(engine))
    }

    /// Whether the credential for `engine` is present.
    ///
    /// Names are matched the way the search client parses them: trimmed,
    /// case-insensitive, with `google` as an alias for `serpapi`.
    #[must_use]
    pub fn has_key_for(&self, engine: &str) -> bool {
        match engine.trim().to_ascii_lowercase().as_str() {
            "serpapi" | "google" => !self.serpapi_key.is_empty(),
            "brave" => !self.brave_key.is_empty(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_serpapi_without_key() {
        let config = SearchConfig::default();
        assert_eq!(config.engines, vec!["serpapi".to_string()]);
        assert!(!config.is_configured());
    }

    #[test]
    fn configured_when_any_listed_engine_has_key() {
        let config = SearchConfig {
            engines: vec!["serpapi".into(), "brave".into()],
            brave_key: "token".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert!(!config.has_key_for("serpapi"));
    }

    #[test]
    fn unlisted_engine_key_does_not_count() {
        let config = SearchConfig {
            brave_key: "token".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn google_alias_counts_as_serpapi() {
        let config = SearchConfig {
            engines: vec!["google".into()],
            serpapi_key: "k".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert!(config.has_key_for("google"));
    }

    #[test]
    fn engine_names_are_case_insensitive() {
        let config = SearchConfig {
            engines: vec![" SerpAPI ".into(), "BRAVE".into()],
            brave_key: "token".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert!(!config.has_key_for("SerpAPI"));
        assert!(config.has_key_for("Brave"));
    }
}
