//! # cite-config
//!
//! Layered configuration loading for Deepcite using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DEEPCITE_*` prefix, `__` as separator)
//! 2. Conventional credential variables (`OPENAI_API_KEY`, `SERPAPI_KEY`, `BRAVE_API_KEY`)
//! 3. Project-level `.deepcite/config.toml`
//! 4. User-level `~/.config/deepcite/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DEEPCITE_RESEARCH__REDUCED_FETCH` -> `research.reduced_fetch`,
//! `DEEPCITE_LLM__BASE_URL` -> `llm.base_url`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use cite_config::CiteConfig;
//!
//! let config = CiteConfig::load_with_dotenv().expect("config");
//! if !config.search.is_configured() {
//!     eprintln!("no search backend credential");
//! }
//! ```

mod cache;
mod embeddings;
mod error;
mod fetch;
mod llm;
mod research;
mod search;

pub use cache::CacheConfig;
pub use embeddings::{EmbeddingProvider, EmbeddingsConfig};
pub use error::ConfigError;
pub use fetch::FetchConfig;
pub use llm::LlmConfig;
pub use research::ResearchConfig;
pub use search::SearchConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Conventional credential variables and the config keys they fill.
const CREDENTIAL_ALIASES: &[(&str, &str)] = &[
    ("OPENAI_API_KEY", "llm.api_key"),
    ("SERPAPI_KEY", "search.serpapi_key"),
    ("BRAVE_API_KEY", "search.brave_key"),
];

const REDACTED: &str = "***";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct CiteConfig {
    #[serde(default)]
    pub research: ResearchConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl CiteConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed, or
    /// [`ConfigError::InvalidValue`] if the research tunables are inconsistent.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.research.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".deepcite/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: conventional credential variables
        for (var, key) in CREDENTIAL_ALIASES {
            figment = figment.merge(Env::raw().only(&[*var]).map(move |_| (*key).into()));
        }

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed("DEEPCITE_").split("__"))
    }

    /// A copy safe to print: credentials replaced with `***`.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for secret in [
            &mut copy.llm.api_key,
            &mut copy.search.serpapi_key,
            &mut copy.search.brave_key,
        ] {
            if !secret.is_empty() {
                *secret = REDACTED.to_string();
            }
        }
        copy
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("deepcite").join("config.toml"))
    }
}
