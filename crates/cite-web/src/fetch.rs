//! HTML page fetching with content-type and size guards.

use std::time::Duration;

use async_trait::async_trait;
use cite_config::FetchConfig;
use cite_core::{CoreError, Page, PageFetcher};

use crate::{error::WebError, extract::extract_page, http::check_response};

/// HTTP client that downloads HTML pages and extracts their readable text.
pub struct PageClient {
    http: reqwest::Client,
    max_bytes: usize,
}

impl PageClient {
    /// Build a client from the `[fetch]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::Http`] if the underlying `reqwest::Client` fails to build.
    pub fn from_config(config: &FetchConfig) -> Result<Self, WebError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            max_bytes: config.max_bytes,
        })
    }

    /// Download `url` and extract title plus readable text.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::UnsupportedContentType`] for non-HTML responses,
    /// [`WebError::TooLarge`] when the declared or streamed body exceeds the
    /// cap, and [`WebError`] for transport or status failures.
    pub async fn fetch_page(&self, url: &str) -> Result<Page, WebError> {
        let resp = check_response(
            self.http
                .get(url)
                .header("Accept", "text/html,application/xhtml+xml")
                .send()
                .await?,
        )
        .await?;

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_html(&content_type) {
            return Err(WebError::UnsupportedContentType(content_type));
        }
        if resp
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(WebError::TooLarge {
                limit: self.max_bytes,
            });
        }

        let body = read_capped(resp, self.max_bytes).await?;
        let page = extract_page(&String::from_utf8_lossy(&body), url);
        tracing::debug!(url, bytes = body.len(), chars = page.text.len(), "fetched page");
        Ok(page)
    }
}

#[async_trait]
impl PageFetcher for PageClient {
    async fn fetch(&self, url: &str) -> Result<Page, CoreError> {
        self.fetch_page(url).await.map_err(WebError::into_fetch_error)
    }
}

/// Servers that omit the header are given the benefit of the doubt.
fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.is_empty() || mime == "text/html" || mime == "application/xhtml+xml"
}

async fn read_capped(mut resp: reqwest::Response, max_bytes: usize) -> Result<Vec<u8>, WebError> {
    let mut body = Vec::new();
    while let Some(chunk) = resp.chunk().await? {
        body.extend_from_slice(&chunk);
        if body.len() > max_bytes {
            return Err(WebError::TooLarge { limit: max_bytes });
        }
    }
    Ok(body)
}
