//! Append-only response cache for search and fetch calls.
//!
//! Entries are JSON values addressed by a SHA-256 hex key. A key, once
//! written, is never overwritten. Read or write failures are logged and
//! treated as cache misses so the wrapped call always proceeds.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cite_core::{CoreError, Page, PageFetcher, SearchResult, WebSearch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::error::WebError;

/// Storage backend for cached responses.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<serde_json::Value>;

    /// Store `value` under `key` unless the key already exists.
    fn put(&self, key: &str, value: &serde_json::Value);
}

/// SHA-256 hex digest of the `|`-joined parts.
#[must_use]
pub fn cache_key(parts: &[&str]) -> String {
    format!("{:x}", Sha256::digest(parts.join("|").as_bytes()))
}

// ── File store ─────────────────────────────────────────────────────

/// One `<key>.json` file per entry under a directory.
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open (creating if needed) a cache directory.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::Cache`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, WebError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        let path = self.path_for(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "cache read failed");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .inspect_err(|e| tracing::warn!(path = %path.display(), %e, "corrupt cache entry"))
            .ok()
    }

    fn put(&self, key: &str, value: &serde_json::Value) {
        let path = self.path_for(key);
        if path.exists() {
            return;
        }
        let result = serde_json::to_vec(value)
            .map_err(std::io::Error::other)
            .and_then(|bytes| {
                let tmp = self.dir.join(format!("{key}.json.tmp"));
                std::fs::write(&tmp, bytes)?;
                std::fs::rename(&tmp, &path)
            });
        if let Err(e) = result {
            tracing::warn!(path = %path.display(), %e, "cache write failed");
        }
    }
}

// ── Memory store ───────────────────────────────────────────────────

/// In-process store, used by tests and when the disk cache is disabled.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn put(&self, key: &str, value: &serde_json::Value) {
        if let Ok(mut entries) = self.entries.lock() {
            entries
                .entry(key.to_string())
                .or_insert_with(|| value.clone());
        }
    }
}

fn load<T: DeserializeOwned>(store: &dyn CacheStore, key: &str) -> Option<T> {
    serde_json::from_value(store.get(key)?)
        .inspect_err(|e| tracing::warn!(key, %e, "cache entry has unexpected shape"))
        .ok()
}

fn save<T: Serialize>(store: &dyn CacheStore, key: &str, value: &T) {
    match serde_json::to_value(value) {
        Ok(json) => store.put(key, &json),
        Err(e) => tracing::warn!(key, %e, "cache entry not serializable"),
    }
}

// ── Decorators ─────────────────────────────────────────────────────

/// Caches successful search responses keyed by engine set, count, and query.
pub struct CachedSearch<S> {
    inner: S,
    store: Arc<dyn CacheStore>,
    namespace: String,
}

impl<S> CachedSearch<S> {
    pub fn new(inner: S, store: Arc<dyn CacheStore>, namespace: impl Into<String>) -> Self {
        Self {
            inner,
            store,
            namespace: namespace.into(),
        }
    }
}

#[async_trait]
impl<S: WebSearch> WebSearch for CachedSearch<S> {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, CoreError> {
        let key = cache_key(&["search", &self.namespace, &count.to_string(), query]);
        if let Some(hit) = load::<Vec<SearchResult>>(self.store.as_ref(), &key) {
            tracing::debug!(query, "search cache hit");
            return Ok(hit);
        }
        let results = self.inner.search(query, count).await?;
        save(self.store.as_ref(), &key, &results);
        Ok(results)
    }
}

/// Caches successfully fetched pages keyed by URL.
pub struct CachedFetcher<F> {
    inner: F,
    store: Arc<dyn CacheStore>,
}

impl<F> CachedFetcher<F> {
    pub fn new(inner: F, store: Arc<dyn CacheStore>) -> Self {
        Self { inner, store }
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for CachedFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<Page, CoreError> {
        let key = cache_key(&["page", url]);
        if let Some(hit) = load::<Page>(self.store.as_ref(), &key) {
            tracing::debug!(url, "page cache hit");
            return Ok(hit);
        }
        let page = self.inner.fetch(url).await?;
        save(self.store.as_ref(), &key, &page);
        Ok(page)
    }
}
