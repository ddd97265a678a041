use std::fmt::Write as _;

use cite_core::ResearchAnswer;
use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a research answer for the terminal or as JSON.
pub fn render_answer(answer: &ResearchAnswer, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => render_json(answer),
        OutputFormat::Text => Ok(render_answer_text(answer)),
    }
}

pub fn render_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn render_answer_text(answer: &ResearchAnswer) -> String {
    let mut out = String::new();
    out.push_str("=== ANSWER ===\n");
    out.push_str(answer.answer.trim());
    out.push_str("\n\n=== REFERENCES ===\n");
    if answer.citations.is_empty() {
        out.push_str("(none)\n");
    }
    for citation in &answer.citations {
        let title = if citation.title.is_empty() {
            &citation.url
        } else {
            &citation.title
        };
        let _ = writeln!(out, "- [{}] {title} :: {}", citation.id, citation.url);
    }
    let _ = write!(out, "\nConfidence: {:.2}", answer.confidence);
    if !answer.gaps.is_empty() {
        out.push_str("\nGaps:");
        for gap in &answer.gaps {
            let _ = write!(out, "\n- {gap}");
        }
    }
    out
}
