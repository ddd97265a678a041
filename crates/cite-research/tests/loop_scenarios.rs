//! End-to-end behaviour of the research loop against deterministic stubs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cite_config::ResearchConfig;
use cite_core::{
    AnswerCritic, AnswerSynthesizer, Citation, CoreError, Critique, Draft, Embedder, Page,
    PageFetcher, QueryPlanner, ResearchAnswer, SearchResult, Source, WebSearch,
};
use cite_research::{
    Collaborators, DEFAULT_FOCUS, RecordingSink, RerankStage, ResearchError, ResearchEvent,
    ResearchLoop, ResearchRequest, Stage,
};
use pretty_assertions::assert_eq;

const QUESTION: &str = "How does Rust manage memory?";

// ── Stubs ──────────────────────────────────────────────────────────

struct Planner {
    first: Vec<String>,
    replan: Vec<String>,
    prompts: Mutex<Vec<String>>,
}

impl Planner {
    fn new(first: &[&str]) -> Self {
        Self {
            first: first.iter().map(ToString::to_string).collect(),
            replan: vec!["follow-up query".to_string()],
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryPlanner for Planner {
    async fn plan(&self, prompt: &str, _model: &str) -> Result<Vec<String>, CoreError> {
        let mut prompts = self.prompts.lock().unwrap();
        let first = prompts.is_empty();
        prompts.push(prompt.to_string());
        Ok(if first {
            self.first.clone()
        } else {
            self.replan.clone()
        })
    }
}

struct Search {
    hits: Vec<SearchResult>,
    fail: bool,
    queries: Mutex<Vec<String>>,
}

impl Search {
    fn new(hits: Vec<SearchResult>) -> Self {
        Self {
            hits,
            fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearch for Search {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, CoreError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(CoreError::NotConfigured {
                what: "serpapi API key".into(),
            });
        }
        Ok(self.hits.iter().take(count).cloned().collect())
    }
}

#[derive(Default)]
struct Fetcher {
    fail: bool,
    /// Page text served for every url, instead of a one-line summary.
    body: Option<String>,
    /// Urls containing any of these extract to blank text.
    blank: Vec<&'static str>,
    calls: AtomicUsize,
}

#[async_trait]
impl PageFetcher for Fetcher {
    async fn fetch(&self, url: &str) -> Result<Page, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CoreError::Fetch(format!("connection refused: {url}")));
        }
        let text = if self.blank.iter().any(|marker| url.contains(marker)) {
            " \n\t ".to_string()
        } else {
            self.body
                .clone()
                .unwrap_or_else(|| format!("{url} explains ownership and borrowing in some detail."))
        };
        Ok(Page {
            url: url.to_string(),
            title: "Page".to_string(),
            text,
        })
    }
}

#[derive(Default)]
struct Synthesizer {
    dangling: Vec<String>,
    sources: Mutex<Vec<Vec<Source>>>,
    models: Mutex<Vec<String>>,
}

impl Synthesizer {
    fn calls(&self) -> Vec<Vec<Source>> {
        self.sources.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerSynthesizer for Synthesizer {
    async fn synthesize(
        &self,
        _question: &str,
        sources: &[Source],
        model: &str,
    ) -> Result<Draft, CoreError> {
        self.sources.lock().unwrap().push(sources.to_vec());
        self.models.lock().unwrap().push(model.to_string());
        let mut citations: Vec<Citation> = sources.iter().map(Source::citation).collect();
        citations.extend(self.dangling.iter().map(|id| Citation {
            id: id.clone(),
            ..Citation::default()
        }));
        Ok(Draft {
            answer: format!("Answer from {} sources", sources.len()),
            citations,
        })
    }
}

struct Critic {
    confidences: Vec<f64>,
    gaps: Vec<String>,
    calls: AtomicUsize,
}

impl Critic {
    fn new(confidences: &[f64], gaps: &[&str]) -> Self {
        Self {
            confidences: confidences.to_vec(),
            gaps: gaps.iter().map(ToString::to_string).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerCritic for Critic {
    async fn critique(
        &self,
        _question: &str,
        _answer: &str,
        _model: &str,
    ) -> Result<Critique, CoreError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let confidence = self.confidences[n.min(self.confidences.len() - 1)];
        Ok(Critique {
            confidence,
            gaps: self.gaps.clone(),
        })
    }
}

struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, CoreError> {
        Err(CoreError::Embedding("model unavailable".into()))
    }
}

/// Texts mentioning "relevant" point one way, everything else the other.
struct KeywordEmbedder;

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CoreError> {
        Ok(texts
            .iter()
            .map(|t| {
                if t.contains("relevant") {
                    vec![1.0, 0.0]
                } else {
                    vec![0.0, 1.0]
                }
            })
            .collect())
    }
}

// ── Harness ────────────────────────────────────────────────────────

fn hit(i: usize, path: &str, snippet: &str) -> SearchResult {
    SearchResult {
        title: format!("Site {i}"),
        url: format!("https://site{i}.example/{path}"),
        snippet: snippet.to_string(),
    }
}

fn hits(n: usize) -> Vec<SearchResult> {
    (1..=n)
        .map(|i| hit(i, "article", &format!("Snippet {i} on memory management")))
        .collect()
}

struct Harness {
    planner: Arc<Planner>,
    search: Arc<Search>,
    fetcher: Arc<Fetcher>,
    synthesizer: Arc<Synthesizer>,
    critic: Arc<Critic>,
    embedder: Option<Arc<dyn Embedder>>,
    sink: Arc<RecordingSink>,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            planner: Arc::new(Planner::new(&["rust memory model"])),
            search: Arc::new(Search::new(hits(3))),
            fetcher: Arc::new(Fetcher::default()),
            synthesizer: Arc::new(Synthesizer::default()),
            critic: Arc::new(Critic::new(&[0.8], &[])),
            embedder: None,
            sink: Arc::new(RecordingSink::new()),
        }
    }
}

impl Harness {
    fn research_loop(&self, config: ResearchConfig) -> ResearchLoop {
        let collaborators = Collaborators {
            planner: self.planner.clone(),
            search: self.search.clone(),
            fetcher: self.fetcher.clone(),
            synthesizer: self.synthesizer.clone(),
            critic: self.critic.clone(),
            embedder: self.embedder.clone(),
        };
        ResearchLoop::new(collaborators, config)
            .unwrap()
            .with_sink(self.sink.clone())
    }

    async fn run(&self, config: ResearchConfig, request: ResearchRequest) -> ResearchAnswer {
        self.research_loop(config).answer(&request).await.unwrap()
    }

    fn events(&self) -> Vec<ResearchEvent> {
        self.sink.events()
    }
}

fn reduced() -> ResearchConfig {
    ResearchConfig {
        reduced_fetch: true,
        ..ResearchConfig::default()
    }
}

fn request() -> ResearchRequest {
    ResearchRequest::new(QUESTION)
}

fn pooled_events(events: Vec<ResearchEvent>) -> Vec<(usize, usize)> {
    events
        .into_iter()
        .filter_map(|e| match e {
            ResearchEvent::EvidencePooled { added, pooled, .. } => Some((added, pooled)),
            _ => None,
        })
        .collect()
}

// ── Scenarios ──────────────────────────────────────────────────────

#[tokio::test]
async fn planner_output_truncated_to_six_queries() {
    let queries = ["q1", "q2", "q3", "q4", "q5", "q6", "q7", "q8"];
    let harness = Harness {
        planner: Arc::new(Planner::new(&queries)),
        ..Harness::default()
    };

    harness.run(reduced(), request().max_iterations(1)).await;

    assert_eq!(harness.search.queries(), vec!["q1", "q2", "q3", "q4", "q5", "q6"]);
}

#[tokio::test]
async fn empty_plan_searches_the_question() {
    let harness = Harness {
        planner: Arc::new(Planner::new(&[])),
        ..Harness::default()
    };

    harness.run(reduced(), request().max_iterations(1)).await;

    assert_eq!(harness.search.queries(), vec![QUESTION.to_string()]);
}

#[tokio::test]
async fn pdf_result_is_filtered_out() {
    let harness = Harness {
        search: Arc::new(Search::new(vec![
            hit(1, "guide", "ownership guide"),
            hit(2, "paper.pdf", "a paper"),
            hit(3, "blog", "borrowing blog"),
        ])),
        ..Harness::default()
    };

    harness.run(reduced(), request().max_iterations(1)).await;

    assert!(harness.events().contains(&ResearchEvent::ResultsFiltered {
        iteration: 1,
        retrieved: 3,
        kept: 2,
    }));
    let sources = &harness.synthesizer.calls()[0];
    assert_eq!(sources.len(), 2);
    assert!(sources.iter().all(|s| !s.url.ends_with(".pdf")));
}

#[tokio::test]
async fn confident_first_critique_stops_immediately() {
    let harness = Harness {
        critic: Arc::new(Critic::new(&[0.9], &[])),
        ..Harness::default()
    };

    let answer = harness.run(reduced(), request().max_iterations(3)).await;

    assert_eq!(harness.planner.prompts().len(), 1);
    assert_eq!(harness.search.queries().len(), 1);
    assert_eq!(harness.synthesizer.calls().len(), 1);
    assert_eq!(harness.critic.calls(), 1);
    assert!((answer.confidence - 0.9).abs() < f64::EPSILON);
    assert!(harness.events().contains(&ResearchEvent::Finished {
        iterations: 1,
        confidence: 0.9,
    }));
}

#[tokio::test]
async fn critique_calls_bounded_by_iterations() {
    let harness = Harness {
        critic: Arc::new(Critic::new(&[0.1], &["recency", "benchmarks"])),
        ..Harness::default()
    };

    let answer = harness.run(reduced(), request().max_iterations(3)).await;

    assert_eq!(harness.critic.calls(), 3);
    assert_eq!(harness.synthesizer.calls().len(), 3);
    let focused = format!("{QUESTION}\nFocus on: recency | benchmarks");
    assert_eq!(
        harness.planner.prompts(),
        vec![QUESTION.to_string(), focused.clone(), focused]
    );
    assert!((answer.confidence - 0.1).abs() < f64::EPSILON);
    assert_eq!(answer.gaps, vec!["recency".to_string(), "benchmarks".to_string()]);
}

#[tokio::test]
async fn empty_gaps_replan_with_default_focus() {
    let harness = Harness {
        critic: Arc::new(Critic::new(&[0.2], &[])),
        ..Harness::default()
    };

    harness.run(reduced(), request().max_iterations(2)).await;

    assert_eq!(
        harness.planner.prompts()[1],
        format!("{QUESTION}\nFocus on: {DEFAULT_FOCUS}")
    );
    assert_eq!(harness.search.queries()[1], "follow-up query");
}

#[tokio::test]
async fn failing_fetches_still_synthesize() {
    let harness = Harness {
        search: Arc::new(Search::new(hits(10))),
        fetcher: Arc::new(Fetcher {
            fail: true,
            ..Fetcher::default()
        }),
        ..Harness::default()
    };

    let answer = harness
        .run(
            ResearchConfig::default(),
            request().max_iterations(1).results_per_query(10),
        )
        .await;

    assert_eq!(harness.fetcher.calls.load(Ordering::SeqCst), 8);
    let failures = harness
        .events()
        .iter()
        .filter(|e| matches!(e, ResearchEvent::FetchFailed { .. }))
        .count();
    assert_eq!(failures, 8);
    assert_eq!(harness.synthesizer.calls(), vec![Vec::<Source>::new()]);
    assert_eq!(answer.answer, "Answer from 0 sources");
    assert!(answer.citations.is_empty());
}

#[tokio::test]
async fn page_fetches_capped_when_fetches_succeed() {
    let harness = Harness {
        search: Arc::new(Search::new(hits(12))),
        ..Harness::default()
    };

    harness
        .run(
            ResearchConfig::default(),
            request().max_iterations(1).results_per_query(12),
        )
        .await;

    assert_eq!(harness.fetcher.calls.load(Ordering::SeqCst), 8);
    assert_eq!(pooled_events(harness.events()), vec![(8, 8)]);
    let mut urls: Vec<String> = harness.synthesizer.calls()[0]
        .iter()
        .map(|s| s.url.clone())
        .collect();
    urls.sort();
    let mut expected: Vec<String> = (1..=8)
        .map(|i| format!("https://site{i}.example/article"))
        .collect();
    expected.sort();
    assert_eq!(urls, expected);
}

#[tokio::test]
async fn long_pages_contribute_two_chunks_each() {
    let harness = Harness {
        fetcher: Arc::new(Fetcher {
            body: Some("memory ownership borrowing lifetimes drop ".repeat(80)),
            ..Fetcher::default()
        }),
        ..Harness::default()
    };

    harness
        .run(ResearchConfig::default(), request().max_iterations(1))
        .await;

    assert_eq!(harness.fetcher.calls.load(Ordering::SeqCst), 3);
    assert_eq!(pooled_events(harness.events()), vec![(6, 6)]);
    // One source per domain even though each page pooled two chunks.
    assert_eq!(harness.synthesizer.calls()[0].len(), 3);
}

#[tokio::test]
async fn blank_pages_are_skipped_silently() {
    let harness = Harness {
        search: Arc::new(Search::new(vec![
            hit(1, "guide", "ownership guide"),
            hit(2, "blank", "javascript-only page"),
            hit(3, "blog", "borrowing blog"),
        ])),
        fetcher: Arc::new(Fetcher {
            blank: vec!["/blank"],
            ..Fetcher::default()
        }),
        ..Harness::default()
    };

    harness
        .run(ResearchConfig::default(), request().max_iterations(1))
        .await;

    assert_eq!(harness.fetcher.calls.load(Ordering::SeqCst), 3);
    assert!(
        !harness
            .events()
            .iter()
            .any(|e| matches!(e, ResearchEvent::FetchFailed { .. }))
    );
    assert_eq!(pooled_events(harness.events()), vec![(2, 2)]);
    let sources = &harness.synthesizer.calls()[0];
    assert_eq!(sources.len(), 2);
    assert!(sources.iter().all(|s| !s.url.contains("/blank")));
}

#[tokio::test]
async fn reduced_and_full_modes_share_shape() {
    let reduced_run = Harness::default();
    let full_run = Harness::default();

    let a = reduced_run.run(reduced(), request().max_iterations(1)).await;
    let b = full_run
        .run(ResearchConfig::default(), request().max_iterations(1))
        .await;

    assert_eq!(a.answer, b.answer);
    assert!((a.confidence - b.confidence).abs() < f64::EPSILON);
    assert_eq!(a.gaps, b.gaps);
    let ids = |answer: &ResearchAnswer| answer.citations.iter().map(|c| c.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&a), ids(&b));
    let urls = |answer: &ResearchAnswer| {
        let mut urls: Vec<String> = answer.citations.iter().map(|c| c.url.clone()).collect();
        urls.sort();
        urls
    };
    assert_eq!(urls(&a), urls(&b));
    assert_eq!(reduced_run.fetcher.calls.load(Ordering::SeqCst), 0);
    assert_eq!(full_run.fetcher.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn zero_iterations_return_fallback() {
    let harness = Harness::default();

    let answer = harness.run(reduced(), request().max_iterations(0)).await;

    assert_eq!(answer, ResearchAnswer::fallback());
    assert!(harness.planner.prompts().is_empty());
    assert!(harness.search.queries().is_empty());
    assert_eq!(harness.critic.calls(), 0);
    assert_eq!(
        harness.events(),
        vec![ResearchEvent::Finished {
            iterations: 0,
            confidence: 0.5,
        }]
    );
}

#[tokio::test]
async fn dangling_citations_are_dropped() {
    let harness = Harness {
        search: Arc::new(Search::new(hits(2))),
        synthesizer: Arc::new(Synthesizer {
            dangling: vec!["S9".to_string()],
            ..Synthesizer::default()
        }),
        ..Harness::default()
    };

    let answer = harness.run(reduced(), request().max_iterations(1)).await;

    let ids: Vec<&str> = answer.citations.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["S1", "S2"]);
    assert!(
        harness
            .events()
            .contains(&ResearchEvent::DanglingCitation { id: "S9".into() })
    );
}

#[tokio::test]
async fn rerank_failures_do_not_abort() {
    let harness = Harness {
        embedder: Some(Arc::new(FailingEmbedder)),
        ..Harness::default()
    };
    let config = ResearchConfig {
        rerank_results: true,
        rerank_chunks: true,
        ..reduced()
    };

    let answer = harness.run(config, request().max_iterations(1)).await;

    assert_eq!(answer.citations.len(), 3);
    let stages: Vec<RerankStage> = harness
        .events()
        .into_iter()
        .filter_map(|e| match e {
            ResearchEvent::RerankSkipped { stage, .. } => Some(stage),
            _ => None,
        })
        .collect();
    assert_eq!(stages, vec![RerankStage::Results, RerankStage::Chunks]);
}

#[tokio::test]
async fn rerank_without_embedder_is_skipped() {
    let harness = Harness::default();
    let config = ResearchConfig {
        rerank_results: true,
        ..reduced()
    };

    harness.run(config, request().max_iterations(1)).await;

    assert!(harness.events().contains(&ResearchEvent::RerankSkipped {
        stage: RerankStage::Results,
        reason: "no embedder configured".into(),
    }));
}

#[tokio::test]
async fn semantic_rerank_moves_relevant_result_first() {
    let harness = Harness {
        search: Arc::new(Search::new(vec![
            hit(1, "a", "nothing to see"),
            hit(2, "b", "the relevant explanation"),
        ])),
        embedder: Some(Arc::new(KeywordEmbedder)),
        ..Harness::default()
    };
    let config = ResearchConfig {
        rerank_results: true,
        ..reduced()
    };

    harness
        .run(
            config,
            ResearchRequest::new("Find the relevant answer").max_iterations(1),
        )
        .await;

    let sources = &harness.synthesizer.calls()[0];
    assert_eq!(sources[0].url, "https://site2.example/b");
    assert_eq!(sources[0].id, "S1");
}

#[tokio::test]
async fn chunk_rerank_keeps_most_similar_evidence() {
    // Six off-topic snippets come first; without re-ranking the plain cap
    // would keep them and drop relevant ones.
    let results: Vec<SearchResult> = (1..=30)
        .map(|i| {
            let snippet = if i <= 6 {
                format!("Snippet {i} about gardening")
            } else {
                format!("Snippet {i} with the relevant detail")
            };
            hit(i, "article", &snippet)
        })
        .collect();
    let harness = Harness {
        search: Arc::new(Search::new(results)),
        embedder: Some(Arc::new(KeywordEmbedder)),
        ..Harness::default()
    };
    let config = ResearchConfig {
        rerank_chunks: true,
        reduced_results: 30,
        ..reduced()
    };

    harness
        .run(
            config,
            ResearchRequest::new("Find the relevant answer")
                .max_iterations(1)
                .results_per_query(30),
        )
        .await;

    let events = harness.events();
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, ResearchEvent::RerankSkipped { .. }))
    );
    assert_eq!(pooled_events(events), vec![(30, 24)]);
    let sources = &harness.synthesizer.calls()[0];
    assert_eq!(sources.len(), 8);
    assert!(sources.iter().all(|s| s.snippet.contains("relevant")));
}

#[tokio::test]
async fn evidence_pool_capped_across_iterations() {
    let harness = Harness {
        search: Arc::new(Search::new(hits(12))),
        critic: Arc::new(Critic::new(&[0.1], &["more"])),
        ..Harness::default()
    };

    harness
        .run(reduced(), request().max_iterations(3).results_per_query(12))
        .await;

    let pooled: Vec<usize> = harness
        .events()
        .into_iter()
        .filter_map(|e| match e {
            ResearchEvent::EvidencePooled { pooled, .. } => Some(pooled),
            _ => None,
        })
        .collect();
    assert_eq!(pooled, vec![10, 20, 24]);
    assert!(harness.synthesizer.calls().iter().all(|s| s.len() <= 8));
}

#[tokio::test]
async fn model_prefix_is_stripped() {
    let harness = Harness::default();

    harness
        .run(reduced(), request().max_iterations(1).model("openai:gpt-4o"))
        .await;

    assert_eq!(*harness.synthesizer.models.lock().unwrap(), vec!["gpt-4o".to_string()]);
}

#[tokio::test]
async fn missing_search_credentials_are_fatal() {
    let harness = Harness {
        search: Arc::new(Search {
            fail: true,
            ..Search::new(hits(3))
        }),
        ..Harness::default()
    };

    let err = harness
        .research_loop(reduced())
        .answer(&request())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ResearchError::Collaborator {
            stage: Stage::Search,
            ..
        }
    ));
    assert!(err.is_configuration());
    assert!(harness.synthesizer.calls().is_empty());
}

#[test]
fn inconsistent_config_rejected() {
    let harness = Harness::default();
    let collaborators = Collaborators {
        planner: harness.planner.clone(),
        search: harness.search.clone(),
        fetcher: harness.fetcher.clone(),
        synthesizer: harness.synthesizer.clone(),
        critic: harness.critic.clone(),
        embedder: None,
    };
    let config = ResearchConfig {
        chunk_overlap: 900,
        ..ResearchConfig::default()
    };
    assert!(matches!(
        ResearchLoop::new(collaborators, config),
        Err(ResearchError::Config(_))
    ));
}
