//! Order-preserving deduplication of search results and evidence.

use std::collections::HashSet;
use std::hash::Hash;

/// Host component of `url`, lowercased. Empty when the url cannot be parsed
/// or has no host.
#[must_use]
pub fn domain(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Heuristic for links to PDF documents, which are heavy to fetch and parse.
#[must_use]
pub fn looks_like_pdf(url: &str) -> bool {
    let u = url.to_lowercase();
    u.ends_with(".pdf") || u.contains("/pdf") || u.contains(".pdf?")
}

/// Keep the first item per key, preserving input order.
///
/// Items whose key is `None` are dropped, not treated as unique.
pub fn dedupe_by_key<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> Option<K>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| key(item).is_some_and(|k| seen.insert(k)))
        .collect()
}

/// Keep the first item per domain of the url returned by `url_of`.
///
/// Items with an empty or unparseable domain are dropped.
pub fn dedupe_by_domain<T, F>(items: impl IntoIterator<Item = T>, url_of: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    dedupe_by_key(items, |item| {
        let d = domain(url_of(item));
        (!d.is_empty()).then_some(d)
    })
}
