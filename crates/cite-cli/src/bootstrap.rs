use std::sync::Arc;

use anyhow::Context;
use cite_config::{CiteConfig, EmbeddingProvider};
use cite_core::{Embedder, PageFetcher, WebSearch};
use cite_embeddings::LocalEmbedder;
use cite_llm::{OpenAiClient, RemoteEmbedder};
use cite_research::Collaborators;
use cite_web::{CacheStore, CachedFetcher, CachedSearch, FileCache, MemoryCache, PageClient, SearchClient};

pub fn load_config() -> anyhow::Result<CiteConfig> {
    CiteConfig::load_with_dotenv().context("failed to load deepcite configuration")
}

/// Build every collaborator the research loop needs from configuration.
pub async fn build_collaborators(config: &CiteConfig) -> anyhow::Result<Collaborators> {
    if !config.search.is_configured() {
        anyhow::bail!(
            "no search backend configured: set SERPAPI_KEY, or BRAVE_API_KEY with \
             search.engines = [\"brave\"]"
        );
    }
    let llm = OpenAiClient::from_config(&config.llm)
        .context("generation backend not configured: set OPENAI_API_KEY")?;

    let search = SearchClient::from_config(&config.search).context("failed to build search client")?;
    let fetcher = PageClient::from_config(&config.fetch).context("failed to build page client")?;

    let (search, fetcher): (Arc<dyn WebSearch>, Arc<dyn PageFetcher>) = if config.cache.enabled {
        let store = open_cache(config);
        let namespace = search.namespace();
        (
            Arc::new(CachedSearch::new(search, Arc::clone(&store), namespace)),
            Arc::new(CachedFetcher::new(fetcher, store)),
        )
    } else {
        (Arc::new(search), Arc::new(fetcher))
    };

    let research = &config.research;
    let embedder = if research.rerank_results || research.rerank_chunks {
        build_embedder(config, &llm).await
    } else {
        None
    };

    let llm = Arc::new(llm);
    Ok(Collaborators {
        planner: llm.clone(),
        search,
        fetcher,
        synthesizer: llm.clone(),
        critic: llm,
        embedder,
    })
}

fn open_cache(config: &CiteConfig) -> Arc<dyn CacheStore> {
    let dir = config.cache.resolved_dir();
    match FileCache::open(&dir) {
        Ok(cache) => Arc::new(cache),
        Err(error) => {
            tracing::warn!(dir = %dir.display(), %error, "cache dir unavailable; caching in memory");
            Arc::new(MemoryCache::new())
        }
    }
}

/// A missing embedder only disables re-ranking, so failures are logged.
async fn build_embedder(config: &CiteConfig, llm: &OpenAiClient) -> Option<Arc<dyn Embedder>> {
    match config.embeddings.provider {
        EmbeddingProvider::Remote => Some(Arc::new(RemoteEmbedder::new(
            llm.clone(),
            config.llm.embedding_model.clone(),
        ))),
        EmbeddingProvider::Local => match tokio::task::spawn_blocking(LocalEmbedder::load).await {
            Ok(Ok(embedder)) => Some(Arc::new(embedder)),
            Ok(Err(error)) => {
                tracing::warn!(%error, "local embedding model unavailable; re-ranking disabled");
                None
            }
            Err(error) => {
                tracing::warn!(%error, "embedding model load task failed; re-ranking disabled");
                None
            }
        },
    }
}
