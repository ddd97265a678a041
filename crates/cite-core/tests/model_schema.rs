//! Serde roundtrip and JsonSchema validation tests for the research data model.

use cite_core::{Citation, Critique, Draft, EvidenceChunk, Page, ResearchAnswer, SearchResult, Source};
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            pretty_assertions::assert_eq!(recovered, val);

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    search_result_roundtrip,
    SearchResult,
    SearchResult {
        title: "Rust ownership".into(),
        url: "https://doc.rust-lang.org/book/ch04-01-what-is-ownership.html".into(),
        snippet: "Ownership is a set of rules".into(),
    }
);

roundtrip_and_validate!(
    page_roundtrip,
    Page,
    Page {
        url: "https://example.org/a".into(),
        title: "A".into(),
        text: "Body text".into(),
    }
);

roundtrip_and_validate!(
    evidence_chunk_roundtrip,
    EvidenceChunk,
    EvidenceChunk {
        chunk: "Borrowing lets you refer to a value".into(),
        url: "https://example.org/borrow".into(),
        score: 3.25,
        title: "Borrowing".into(),
    }
);

roundtrip_and_validate!(
    source_roundtrip,
    Source,
    Source {
        id: "S1".into(),
        url: "https://example.org/borrow".into(),
        title: "Borrowing".into(),
        snippet: "Borrowing lets you refer to a value".into(),
    }
);

roundtrip_and_validate!(
    draft_roundtrip,
    Draft,
    Draft {
        answer: "Rust uses ownership [S1].".into(),
        citations: vec![Citation {
            id: "S1".into(),
            url: "https://example.org/borrow".into(),
            title: "Borrowing".into(),
        }],
    }
);

roundtrip_and_validate!(
    critique_roundtrip,
    Critique,
    Critique {
        confidence: 0.8,
        gaps: vec!["recency".into()],
    }
);

roundtrip_and_validate!(answer_fallback_roundtrip, ResearchAnswer, ResearchAnswer::fallback());

#[test]
fn fallback_answer_shape() {
    let fallback = ResearchAnswer::fallback();
    assert_eq!(fallback.answer, "Unable to reach high confidence.");
    assert!(fallback.citations.is_empty());
    assert!(fallback.gaps.is_empty());
    assert!((fallback.confidence - 0.5).abs() < f64::EPSILON);
}
