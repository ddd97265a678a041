//! Shared HTTP response helpers for search and fetch clients.
//!
//! Centralizes status-code checks (429 with `Retry-After` parsing,
//! non-success → [`WebError::Api`]) so each backend module stays focused on
//! request construction and response mapping.

use crate::error::WebError;

/// Longest error body kept in [`WebError::Api`].
const MAX_ERROR_BODY: usize = 300;

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`WebError::RateLimited`], `Retry-After`
///   seconds or 60 when absent/unparseable.
/// - **Non-success status** → [`WebError::Api`] with the clipped body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, WebError> {
    if resp.status() == 429 {
        return Err(WebError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(WebError::Api {
            status,
            message: body.chars().take(MAX_ERROR_BODY).collect(),
        });
    }
    Ok(resp)
}

fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(60)
}
