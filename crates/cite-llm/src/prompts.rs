//! Prompt text for the planner, synthesizer, and critic.

use std::fmt::Write as _;

use cite_core::Source;

/// Snippets longer than this are clipped before being shown to the synthesizer.
pub const SOURCE_SNIPPET_CHARS: usize = 1200;

pub const PLANNER_SYSTEM: &str = "You create diverse, high-coverage web search queries in English.";

pub const SYNTHESIZER_SYSTEM: &str =
    "You write concise, neutral, well-cited syntheses using only provided sources.";

pub const CRITIC_SYSTEM: &str =
    "You critically review answers for coverage, sourcing, and contradictions.";

#[must_use]
pub fn planner_user(prompt: &str) -> String {
    format!(
        "User question:\n{prompt}\n\n\
         Produce 4-8 diverse search queries covering subtopics, synonyms, and contrasting views.\n\
         Return JSON: {{\"queries\": [\"...\", \"...\"]}}"
    )
}

/// Render sources as `[S1] url` followed by the clipped snippet, blank-line separated.
#[must_use]
pub fn source_block(sources: &[Source]) -> String {
    let mut block = String::new();
    for (i, source) in sources.iter().enumerate() {
        if i > 0 {
            block.push_str("\n\n");
        }
        let snippet: String = source.snippet.chars().take(SOURCE_SNIPPET_CHARS).collect();
        let _ = write!(block, "[{}] {}\n{snippet}", source.id, source.url);
    }
    block
}

#[must_use]
pub fn synthesizer_user(question: &str, sources: &[Source]) -> String {
    format!(
        "Question: {question}\n\n\
         You are given SOURCES as (id, url, snippet). Use only these sources; paraphrase claims \
         and add inline citations like [S1].\n\
         Ensure every paragraph has at least one citation. Keep it factual and balanced.\n\
         SOURCES:\n{}\n\n\
         Return JSON:\n\
         {{\"answer\": \"...\", \"citations\": [{{\"id\": \"S1\", \"url\": \"...\", \"title\": \"...\"}}]}}",
        source_block(sources)
    )
}

#[must_use]
pub fn critic_user(question: &str, answer: &str) -> String {
    format!(
        "Question: {question}\n\
         Answer:\n\"\"\"\n{answer}\n\"\"\"\n\n\
         Provide a confidence between 0 and 1, and list gaps (missing subtopics, weak sourcing, \
         contradictions).\n\
         Return JSON: {{\"confidence\": 0.0, \"gaps\": [\"...\", \"...\"]}}"
    )
}
