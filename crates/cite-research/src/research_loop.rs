//! The research loop: plan, search, gather evidence, synthesize, critique,
//! and re-plan until the critic is confident or the iteration budget runs out.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use cite_config::ResearchConfig;
use cite_core::{Draft, EvidenceChunk, ResearchAnswer, SearchResult, Source};
use cite_search::{
    chunk_text, dedupe_by_domain, dedupe_by_key, looks_like_pdf, rank_chunks,
    rerank_by_embedding, select_sources,
};
use futures::{StreamExt, stream};

use crate::collaborators::Collaborators;
use crate::error::{ResearchError, Stage};
use crate::events::{EventSink, RerankStage, ResearchEvent, TracingSink};

/// Re-plan focus used when the critic reports no gaps.
pub const DEFAULT_FOCUS: &str = "Expand on counterpoints and recency";

/// Separator between critic gaps in the re-plan focus.
const GAP_SEPARATOR: &str = " | ";

/// One question plus per-call overrides of the configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchRequest {
    pub question: String,
    pub max_iterations: Option<u32>,
    pub results_per_query: Option<usize>,
    /// Generation model; a `provider:` prefix is stripped.
    pub model: Option<String>,
    /// `None` defers to `research.reduced_fetch`.
    pub reduced_fetch: Option<bool>,
}

impl ResearchRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn max_iterations(mut self, n: u32) -> Self {
        self.max_iterations = Some(n);
        self
    }

    #[must_use]
    pub fn results_per_query(mut self, n: usize) -> Self {
        self.results_per_query = Some(n);
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn reduced_fetch(mut self, reduced: bool) -> Self {
        self.reduced_fetch = Some(reduced);
        self
    }
}

/// Settings for one session after applying request overrides.
struct Session<'a> {
    question: &'a str,
    model: String,
    max_iterations: u32,
    results_per_query: usize,
    reduced_fetch: bool,
}

/// Drives the collaborators through the iterative research algorithm.
pub struct ResearchLoop {
    collaborators: Collaborators,
    config: ResearchConfig,
    sink: Arc<dyn EventSink>,
}

impl ResearchLoop {
    /// Create a loop reporting to [`TracingSink`].
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::Config`] if the tunables are inconsistent.
    pub fn new(collaborators: Collaborators, config: ResearchConfig) -> Result<Self, ResearchError> {
        config.validate()?;
        Ok(Self {
            collaborators,
            config,
            sink: Arc::new(TracingSink),
        })
    }

    /// Replace the event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ResearchConfig {
        &self.config
    }

    /// Research `request.question` and return the best cited answer.
    ///
    /// Returns [`ResearchAnswer::fallback`] when the iteration budget is zero.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::Collaborator`] when the planner, search,
    /// synthesizer, or critic fails. Fetch and re-rank failures are reported
    /// as events and never end the session.
    pub async fn answer(&self, request: &ResearchRequest) -> Result<ResearchAnswer, ResearchError> {
        let session = Session {
            question: &request.question,
            model: ResearchConfig::normalize_model(
                request.model.as_deref().unwrap_or(&self.config.model),
            )
            .to_string(),
            max_iterations: request.max_iterations.unwrap_or(self.config.max_iterations),
            results_per_query: request
                .results_per_query
                .unwrap_or(self.config.results_per_query),
            reduced_fetch: request.reduced_fetch.unwrap_or(self.config.reduced_fetch),
        };

        if session.max_iterations == 0 {
            let fallback = ResearchAnswer::fallback();
            self.sink.emit(ResearchEvent::Finished {
                iterations: 0,
                confidence: fallback.confidence,
            });
            return Ok(fallback);
        }

        let mut queries = self.plan(&session, session.question, 1).await?;
        let mut pool: Vec<EvidenceChunk> = Vec::new();

        for iteration in 1..=session.max_iterations {
            self.sink.emit(ResearchEvent::IterationStarted {
                iteration,
                max_iterations: session.max_iterations,
            });

            let retrieved = self.retrieve(&queries, session.results_per_query).await?;
            let retrieved_count = retrieved.len();
            let mut results = filter_results(retrieved);
            self.sink.emit(ResearchEvent::ResultsFiltered {
                iteration,
                retrieved: retrieved_count,
                kept: results.len(),
            });

            if self.config.rerank_results && !results.is_empty() {
                results = self.rerank_results(session.question, results).await;
            }

            let added = if session.reduced_fetch {
                self.snippet_evidence(&results)
            } else {
                self.page_evidence(session.question, &results).await
            };
            let added_count = added.len();
            pool.extend(added);

            if self.config.rerank_chunks && !pool.is_empty() {
                pool = self.rerank_chunks(session.question, pool).await;
            }
            sort_and_cap(&mut pool, self.config.evidence_cap);
            self.sink.emit(ResearchEvent::EvidencePooled {
                iteration,
                added: added_count,
                pooled: pool.len(),
            });

            let sources = select_sources(&pool, self.config.max_sources);
            self.sink.emit(ResearchEvent::SourcesSelected {
                iteration,
                count: sources.len(),
            });

            let draft = self
                .collaborators
                .synthesizer
                .synthesize(session.question, &sources, &session.model)
                .await
                .map_err(ResearchError::at(Stage::Synthesize))?;
            let draft = self.drop_dangling_citations(draft, &sources);

            let critique = self
                .collaborators
                .critic
                .critique(session.question, &draft.answer, &session.model)
                .await
                .map_err(ResearchError::at(Stage::Critique))?;
            self.sink.emit(ResearchEvent::CritiqueReceived {
                iteration,
                confidence: critique.confidence,
                gaps: critique.gaps.len(),
            });

            if critique.confidence >= self.config.confidence_threshold
                || iteration == session.max_iterations
            {
                self.sink.emit(ResearchEvent::Finished {
                    iterations: iteration,
                    confidence: critique.confidence,
                });
                return Ok(ResearchAnswer {
                    answer: draft.answer,
                    citations: draft.citations,
                    confidence: critique.confidence,
                    gaps: critique.gaps,
                });
            }

            let focus = if critique.gaps.is_empty() {
                DEFAULT_FOCUS.to_string()
            } else {
                critique.gaps.join(GAP_SEPARATOR)
            };
            let prompt = format!("{}\nFocus on: {focus}", session.question);
            queries = self.plan(&session, &prompt, iteration + 1).await?;
        }

        Ok(ResearchAnswer::fallback())
    }

    /// Ask the planner for queries, capped to `max_queries`. An empty plan
    /// falls back to the bare question.
    async fn plan(
        &self,
        session: &Session<'_>,
        prompt: &str,
        iteration: u32,
    ) -> Result<Vec<String>, ResearchError> {
        let mut queries = self
            .collaborators
            .planner
            .plan(prompt, &session.model)
            .await
            .map_err(ResearchError::at(Stage::Plan))?;
        queries.truncate(self.config.max_queries);
        if queries.is_empty() {
            tracing::warn!("planner returned no queries, searching the question itself");
            queries.push(session.question.to_string());
        }
        self.sink.emit(ResearchEvent::QueriesPlanned {
            iteration,
            queries: queries.clone(),
        });
        Ok(queries)
    }

    /// Search every query concurrently; hits are concatenated in query order.
    async fn retrieve(
        &self,
        queries: &[String],
        per_query: usize,
    ) -> Result<Vec<SearchResult>, ResearchError> {
        let search = &self.collaborators.search;
        let batches = futures::future::try_join_all(
            queries.iter().map(|query| search.search(query, per_query)),
        )
        .await
        .map_err(ResearchError::at(Stage::Search))?;
        Ok(batches.into_iter().flatten().collect())
    }

    async fn rerank_results(&self, question: &str, results: Vec<SearchResult>) -> Vec<SearchResult> {
        let Some(embedder) = &self.collaborators.embedder else {
            self.skip_rerank(RerankStage::Results, "no embedder configured");
            return results;
        };
        let texts: Vec<String> = results
            .iter()
            .map(|r| format!("{} {}", r.title, r.snippet))
            .collect();
        match rerank_by_embedding(embedder.as_ref(), question, &texts, texts.len()).await {
            Ok(ranked) => {
                let mut slots: Vec<Option<SearchResult>> = results.into_iter().map(Some).collect();
                ranked
                    .into_iter()
                    .filter_map(|(index, _)| slots.get_mut(index).and_then(Option::take))
                    .collect()
            }
            Err(e) => {
                self.skip_rerank(RerankStage::Results, &e.to_string());
                results
            }
        }
    }

    async fn rerank_chunks(&self, question: &str, pool: Vec<EvidenceChunk>) -> Vec<EvidenceChunk> {
        let Some(embedder) = &self.collaborators.embedder else {
            self.skip_rerank(RerankStage::Chunks, "no embedder configured");
            return pool;
        };
        let cap = self.config.evidence_cap;
        let texts: Vec<String> = pool.iter().map(|c| c.chunk.clone()).collect();
        match rerank_by_embedding(embedder.as_ref(), question, &texts, cap).await {
            Ok(ranked) => {
                let keep: HashSet<&str> = ranked
                    .iter()
                    .filter_map(|(index, _)| texts.get(*index).map(String::as_str))
                    .collect();
                pool.into_iter()
                    .filter(|c| keep.contains(c.chunk.as_str()))
                    .take(cap)
                    .collect()
            }
            Err(e) => {
                self.skip_rerank(RerankStage::Chunks, &e.to_string());
                pool
            }
        }
    }

    fn skip_rerank(&self, stage: RerankStage, reason: &str) {
        self.sink.emit(ResearchEvent::RerankSkipped {
            stage,
            reason: reason.to_string(),
        });
    }

    /// Reduced mode: search snippets become flat-scored evidence.
    fn snippet_evidence(&self, results: &[SearchResult]) -> Vec<EvidenceChunk> {
        results
            .iter()
            .take(self.config.reduced_results)
            .filter(|r| !r.snippet.is_empty())
            .map(|r| EvidenceChunk {
                chunk: r.snippet.chars().take(self.config.snippet_chars).collect(),
                url: r.url.clone(),
                score: 1.0,
                title: title_or_url(&r.title, &r.url),
            })
            .collect()
    }

    /// Full mode: fetch up to `max_pages` results and keep the best chunks of each.
    ///
    /// The cap counts attempts, so failed fetches use up a slot.
    async fn page_evidence(&self, question: &str, results: &[SearchResult]) -> Vec<EvidenceChunk> {
        let fetcher = &self.collaborators.fetcher;
        let fetched: Vec<_> = stream::iter(results.iter().take(self.config.max_pages))
            .map(|result| async move { (result, fetcher.fetch(&result.url).await) })
            .buffered(self.config.fetch_concurrency)
            .collect()
            .await;

        let mut evidence = Vec::new();
        for (result, outcome) in fetched {
            let page = match outcome {
                Ok(page) => page,
                Err(e) => {
                    self.sink.emit(ResearchEvent::FetchFailed {
                        url: result.url.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };
            if page.text.trim().is_empty() {
                continue;
            }
            let title = title_or_url(&page.title, &result.url);
            let chunks = chunk_text(&page.text, self.config.chunk_window, self.config.chunk_overlap);
            for (chunk, score) in rank_chunks(&chunks, question, self.config.chunks_per_page) {
                evidence.push(EvidenceChunk {
                    chunk,
                    url: result.url.clone(),
                    score,
                    title: title.clone(),
                });
            }
        }
        evidence
    }

    fn drop_dangling_citations(&self, mut draft: Draft, sources: &[Source]) -> Draft {
        let known: HashSet<&str> = sources.iter().map(|s| s.id.as_str()).collect();
        draft.citations.retain(|citation| {
            let valid = known.contains(citation.id.as_str());
            if !valid {
                self.sink.emit(ResearchEvent::DanglingCitation {
                    id: citation.id.clone(),
                });
            }
            valid
        });
        draft
    }
}

/// Dedupe by url, drop pdf-looking links, then keep one result per domain.
fn filter_results(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let unique = dedupe_by_key(results, |r| (!r.url.is_empty()).then(|| r.url.clone()));
    let html = unique.into_iter().filter(|r| !looks_like_pdf(&r.url));
    dedupe_by_domain(html, |r| r.url.as_str())
}

/// Stable sort by descending score, then keep the top `cap`.
fn sort_and_cap(pool: &mut Vec<EvidenceChunk>, cap: usize) {
    pool.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    pool.truncate(cap);
}

fn title_or_url(title: &str, url: &str) -> String {
    if title.is_empty() {
        url.to_string()
    } else {
        title.to_string()
    }
}
