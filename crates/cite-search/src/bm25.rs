//! Okapi BM25 lexical relevance.
//!
//! The corpus is the chunk list being ranked, so inverse document frequency
//! is relative to that list. Tokenisation is plain whitespace splitting with
//! no case folding or stemming.
//!
//! Terms that occur in more than half the corpus would get a negative IDF;
//! those are floored at `epsilon * mean_idf`, as in the usual Okapi variant.

use std::collections::HashMap;

/// Term-frequency saturation.
const K1: f64 = 1.5;
/// Length normalisation strength.
const B: f64 = 0.75;
/// Floor factor for negative IDF values.
const EPSILON: f64 = 0.25;

/// BM25 index over a small in-memory corpus.
#[derive(Debug, Clone)]
pub struct Bm25 {
    doc_freqs: Vec<HashMap<String, usize>>,
    doc_lens: Vec<usize>,
    avgdl: f64,
    idf: HashMap<String, f64>,
}

impl Bm25 {
    /// Build an index over whitespace-tokenised documents.
    #[must_use]
    pub fn new<S: AsRef<str>>(docs: &[S]) -> Self {
        let mut doc_freqs = Vec::with_capacity(docs.len());
        let mut doc_lens = Vec::with_capacity(docs.len());
        let mut containing: HashMap<String, usize> = HashMap::new();

        for doc in docs {
            let mut freqs: HashMap<String, usize> = HashMap::new();
            let mut len = 0;
            for token in doc.as_ref().split_whitespace() {
                *freqs.entry(token.to_string()).or_default() += 1;
                len += 1;
            }
            for term in freqs.keys() {
                *containing.entry(term.clone()).or_default() += 1;
            }
            doc_freqs.push(freqs);
            doc_lens.push(len);
        }

        #[allow(clippy::cast_precision_loss)]
        let n = docs.len() as f64;
        #[allow(clippy::cast_precision_loss)]
        let avgdl = if docs.is_empty() {
            0.0
        } else {
            doc_lens.iter().sum::<usize>() as f64 / n
        };

        #[allow(clippy::cast_precision_loss)]
        let mut idf: HashMap<String, f64> = containing
            .into_iter()
            .map(|(term, df)| {
                let df = df as f64;
                (term, ((n - df + 0.5) / (df + 0.5)).ln())
            })
            .collect();

        if !idf.is_empty() {
            #[allow(clippy::cast_precision_loss)]
            let mean = idf.values().sum::<f64>() / idf.len() as f64;
            let floor = EPSILON * mean;
            for value in idf.values_mut() {
                if *value < 0.0 {
                    *value = floor;
                }
            }
        }

        Self {
            doc_freqs,
            doc_lens,
            avgdl,
            idf,
        }
    }

    /// Score every document against a whitespace-tokenised query.
    #[must_use]
    pub fn scores(&self, query: &str) -> Vec<f64> {
        let terms: Vec<&str> = query.split_whitespace().collect();
        self.doc_freqs
            .iter()
            .zip(&self.doc_lens)
            .map(|(freqs, &len)| {
                #[allow(clippy::cast_precision_loss)]
                let len_norm = if self.avgdl > 0.0 {
                    len as f64 / self.avgdl
                } else {
                    0.0
                };
                terms
                    .iter()
                    .map(|term| {
                        let Some(&tf) = freqs.get(*term) else {
                            return 0.0;
                        };
                        let idf = self.idf.get(*term).copied().unwrap_or(0.0);
                        #[allow(clippy::cast_precision_loss)]
                        let tf = tf as f64;
                        idf * (tf * (K1 + 1.0)) / (tf + K1 * (1.0 - B + B * len_norm))
                    })
                    .sum()
            })
            .collect()
    }
}

/// Rank `chunks` against `query`, returning the best `top_n` with scores.
///
/// Ordering is by descending score; ties keep their input order.
#[must_use]
pub fn rank_chunks(chunks: &[String], query: &str, top_n: usize) -> Vec<(String, f64)> {
    if chunks.is_empty() || top_n == 0 {
        return Vec::new();
    }
    let scores = Bm25::new(chunks).scores(query);
    let mut scored: Vec<(String, f64)> = chunks.iter().cloned().zip(scores).collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn corpus() -> Vec<String> {
        vec![
            "tokio is an async runtime for rust".to_string(),
            "the borrow checker enforces ownership rules".to_string(),
            "async tasks in tokio are cheap to spawn and tokio schedules them".to_string(),
            "chocolate cake recipe with buttercream".to_string(),
        ]
    }

    #[test]
    fn matching_document_outranks_unrelated() {
        let ranked = rank_chunks(&corpus(), "tokio spawn schedules", 4);
        assert!(ranked[0].0.contains("schedules"));
        assert!(ranked[0].1 > 0.0);
        let cake = ranked.iter().find(|(c, _)| c.contains("cake")).unwrap();
        assert!(cake.1.abs() < f64::EPSILON, "unrelated doc should score 0");
    }

    #[test]
    fn unknown_query_terms_score_zero() {
        let scores = Bm25::new(&corpus()).scores("quantum chromodynamics");
        assert!(scores.iter().all(|s| s.abs() < f64::EPSILON));
    }

    #[test]
    fn ties_keep_input_order() {
        let chunks = vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()];
        let ranked = rank_chunks(&chunks, "delta", 3);
        let order: Vec<&str> = ranked.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(order, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn common_terms_get_floored_positive_idf() {
        // "rust" appears in 3 of 4 docs -> raw idf negative, floored to eps * mean.
        let docs = ["rust a", "rust b", "rust c", "d e"];
        let bm = Bm25::new(&docs);
        let idf = bm.idf["rust"];
        assert!(idf > 0.0, "floored idf should be positive, got {idf}");
    }

    #[test]
    fn tokenisation_is_case_sensitive() {
        let docs = ["Tokio runtime", "other words here"];
        let scores = Bm25::new(&docs).scores("tokio");
        assert!(scores[0].abs() < f64::EPSILON);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(10)]
    fn result_length_and_monotonic_scores(#[case] top_n: usize) {
        let chunks = corpus();
        let ranked = rank_chunks(&chunks, "tokio async rust ownership", top_n);
        assert!(ranked.len() <= top_n.min(chunks.len()));
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn empty_corpus_ranks_nothing() {
        assert!(rank_chunks(&[], "anything", 5).is_empty());
    }
}
