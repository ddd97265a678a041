//! SerpAPI (Google engine) search backend.

use cite_core::SearchResult;

use crate::{SearchClient, SearchEngine, error::WebError, http::check_response};

#[derive(serde::Deserialize)]
struct SerpResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(serde::Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl From<OrganicResult> for SearchResult {
    fn from(r: OrganicResult) -> Self {
        Self {
            title: r.title,
            url: r.link,
            snippet: r.snippet,
        }
    }
}

/// The first `count` organic results, minus those without a link.
///
/// Truncation happens first, so a linkless entry still uses one of the slots.
fn into_results(data: SerpResponse, count: usize) -> Vec<SearchResult> {
    data.organic_results
        .into_iter()
        .take(count)
        .filter(|r| !r.link.is_empty())
        .map(SearchResult::from)
        .collect()
}

impl SearchClient {
    /// Query SerpAPI's Google engine.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::MissingApiKey`] without touching the network when no
    /// key is configured, otherwise [`WebError`] for HTTP or parse failures.
    pub async fn search_serpapi(
        &self,
        query: &str,
        count: usize,
    ) -> Result<Vec<SearchResult>, WebError> {
        let key = self.key_for(SearchEngine::SerpApi)?;
        let url = format!(
            "https://serpapi.com/search.json?engine=google&q={}&num={count}&api_key={}",
            urlencoding::encode(query),
            urlencoding::encode(key)
        );
        let resp = check_response(self.http.get(&url).send().await?).await?;

        let data: SerpResponse = resp.json().await?;
        let results = into_results(data, count);
        tracing::debug!(query, hits = results.len(), "serpapi search");
        Ok(results)
    }
}
