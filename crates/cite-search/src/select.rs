//! Domain-diverse source selection.

use std::collections::HashSet;

use cite_core::{EvidenceChunk, Source};

use crate::dedup::domain;

/// Build the ID-labelled source list shown to the synthesizer.
///
/// Walks `pool` in the given order (callers sort by score first), accepting
/// at most one chunk per domain and labelling accepted chunks `S1`, `S2`, ...
/// An unparseable url counts as the empty domain, so only one such chunk
/// survives.
#[must_use]
pub fn select_sources(pool: &[EvidenceChunk], max_sources: usize) -> Vec<Source> {
    let mut seen_domains = HashSet::new();
    let mut sources = Vec::new();

    for evidence in pool {
        if sources.len() >= max_sources {
            break;
        }
        if !seen_domains.insert(domain(&evidence.url)) {
            continue;
        }
        sources.push(Source {
            id: format!("S{}", sources.len() + 1),
            url: evidence.url.clone(),
            title: evidence.title.clone(),
            snippet: evidence.chunk.clone(),
        });
    }

    sources
}
