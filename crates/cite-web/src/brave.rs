//! Brave Search API backend.

use cite_core::SearchResult;

use crate::{SearchClient, SearchEngine, error::WebError, http::check_response};

/// Brave caps `count` at 20 per request.
const MAX_COUNT: usize = 20;

#[derive(serde::Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
}

#[derive(serde::Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(serde::Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
}

fn into_results(data: BraveResponse) -> Vec<SearchResult> {
    data.web
        .map(|web| web.results)
        .unwrap_or_default()
        .into_iter()
        .map(|r| SearchResult {
            title: r.title,
            url: r.url,
            snippet: r.description,
        })
        .collect()
}

impl SearchClient {
    /// Query the Brave web search endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::MissingApiKey`] without touching the network when no
    /// token is configured, otherwise [`WebError`] for HTTP or parse failures.
    pub async fn search_brave(
        &self,
        query: &str,
        count: usize,
    ) -> Result<Vec<SearchResult>, WebError> {
        let token = self.key_for(SearchEngine::Brave)?;
        let url = format!(
            "https://api.search.brave.com/res/v1/web/search?q={}&count={}",
            urlencoding::encode(query),
            count.clamp(1, MAX_COUNT)
        );
        let resp = check_response(
            self.http
                .get(&url)
                .header("Accept", "application/json")
                .header("X-Subscription-Token", token)
                .send()
                .await?,
        )
        .await?;

        let data: BraveResponse = resp.json().await?;
        let mut results = into_results(data);
        results.truncate(count);
        tracing::debug!(query, hits = results.len(), "brave search");
        Ok(results)
    }
}
