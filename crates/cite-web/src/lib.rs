//! # cite-web
//!
//! Web-facing collaborators for Deepcite:
//! - [`SearchClient`]: SerpAPI and Brave search backends, queried
//!   concurrently when more than one engine is configured
//! - [`PageClient`]: HTML page download with size and content-type guards,
//!   plus readable-text extraction
//! - [`cache`]: append-only response cache and the caching decorators that
//!   wrap any [`WebSearch`] or [`PageFetcher`]

pub mod brave;
pub mod cache;
pub mod extract;
pub mod fetch;
pub mod serpapi;

mod error;
mod http;

pub use cache::{CacheStore, CachedFetcher, CachedSearch, FileCache, MemoryCache, cache_key};
pub use error::WebError;
pub use fetch::PageClient;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use cite_config::SearchConfig;
use cite_core::{CoreError, SearchResult, WebSearch};

// ── Engines ────────────────────────────────────────────────────────

/// A supported web search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchEngine {
    SerpApi,
    Brave,
}

impl SearchEngine {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SerpApi => "serpapi",
            Self::Brave => "brave",
        }
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchEngine {
    type Err = WebError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serpapi" | "google" => Ok(Self::SerpApi),
            "brave" => Ok(Self::Brave),
            other => Err(WebError::UnsupportedEngine(other.to_string())),
        }
    }
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client for the configured web search engines.
pub struct SearchClient {
    http: reqwest::Client,
    engines: Vec<SearchEngine>,
    serpapi_key: String,
    brave_key: String,
}

impl SearchClient {
    /// Build a client from the `[search]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::UnsupportedEngine`] for an unknown engine name, or
    /// [`WebError::Http`] if the underlying `reqwest::Client` fails to build.
    pub fn from_config(config: &SearchConfig) -> Result<Self, WebError> {
        let mut engines = Vec::with_capacity(config.engines.len());
        for name in &config.engines {
            let engine = name.parse::<SearchEngine>()?;
            if !engines.contains(&engine) {
                engines.push(engine);
            }
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("deepcite/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            engines,
            serpapi_key: config.serpapi_key.clone(),
            brave_key: config.brave_key.clone(),
        })
    }

    /// Engines queried by [`search_all`](Self::search_all), in merge order.
    #[must_use]
    pub fn engines(&self) -> &[SearchEngine] {
        &self.engines
    }

    /// Cache namespace identifying this engine set, e.g. `serpapi+brave`.
    #[must_use]
    pub fn namespace(&self) -> String {
        self.engines
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Search a single engine.
    ///
    /// # Errors
    ///
    /// Returns [`WebError`] if the engine has no key, the request fails, or
    /// the response cannot be parsed.
    pub async fn search_engine(
        &self,
        engine: SearchEngine,
        query: &str,
        count: usize,
    ) -> Result<Vec<SearchResult>, WebError> {
        match engine {
            SearchEngine::SerpApi => self.search_serpapi(query, count).await,
            SearchEngine::Brave => self.search_brave(query, count).await,
        }
    }

    /// Search every configured engine concurrently and concatenate results in
    /// engine order, keeping at most `count`.
    ///
    /// A failing engine is logged and skipped while at least one other engine
    /// answers.
    ///
    /// # Errors
    ///
    /// Returns the first engine's error when every engine fails, or
    /// [`WebError::MissingApiKey`] when no engine is configured at all.
    pub async fn search_all(
        &self,
        query: &str,
        count: usize,
    ) -> Result<Vec<SearchResult>, WebError> {
        let outcomes = futures::future::join_all(
            self.engines
                .iter()
                .map(|engine| self.search_engine(*engine, query, count)),
        )
        .await;
        merge_outcomes(self.engines.iter().copied().zip(outcomes), count)
    }

    fn key_for(&self, engine: SearchEngine) -> Result<&str, WebError> {
        let key = match engine {
            SearchEngine::SerpApi => &self.serpapi_key,
            SearchEngine::Brave => &self.brave_key,
        };
        if key.is_empty() {
            return Err(WebError::MissingApiKey {
                engine: engine.to_string(),
            });
        }
        Ok(key)
    }
}

/// Concatenate per-engine outcomes in order and truncate to `count`.
fn merge_outcomes(
    outcomes: impl IntoIterator<Item = (SearchEngine, Result<Vec<SearchResult>, WebError>)>,
    count: usize,
) -> Result<Vec<SearchResult>, WebError> {
    let mut results = Vec::new();
    let mut first_error = None;
    let mut answered = false;
    for (engine, outcome) in outcomes {
        match outcome {
            Ok(items) => {
                answered = true;
                results.extend(items);
            }
            Err(e) => {
                tracing::warn!(engine = engine.as_str(), %e, "search engine failed");
                first_error.get_or_insert(e);
            }
        }
    }

    if answered {
        results.truncate(count);
        return Ok(results);
    }
    Err(first_error.unwrap_or_else(|| WebError::MissingApiKey {
        engine: "search".to_string(),
    }))
}

#[async_trait]
impl WebSearch for SearchClient {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, CoreError> {
        self.search_all(query, count)
            .await
            .map_err(WebError::into_search_error)
    }
}
