//! Integration tests for TOML and environment configuration loading.
//!
//! Uses `figment::Jail` for sandboxed env var and working-directory manipulation.

use cite_config::{CiteConfig, ConfigError, EmbeddingProvider};
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};

#[test]
fn loads_research_section_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[research]
max_iterations = 3
results_per_query = 4
model = "openai:gpt-4o"
reduced_fetch = true
rerank_chunks = true
"#,
        )?;

        let config: CiteConfig = Figment::from(Serialized::defaults(CiteConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.research.max_iterations, 3);
        assert_eq!(config.research.results_per_query, 4);
        assert_eq!(config.research.model_name(), "gpt-4o");
        assert!(config.research.reduced_fetch);
        assert!(!config.research.rerank_results);
        assert!(config.research.rerank_chunks);
        // untouched tunables keep their defaults
        assert_eq!(config.research.max_pages, 8);
        assert_eq!(config.research.evidence_cap, 24);
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".deepcite")?;
        jail.create_file(
            ".deepcite/config.toml",
            r#"
[search]
engines = ["brave", "serpapi"]
brave_key = "brave-token"

[embeddings]
provider = "remote"
"#,
        )?;

        let config = CiteConfig::load().expect("config loads");
        assert_eq!(config.search.engines, vec!["brave", "serpapi"]);
        assert!(config.search.is_configured());
        assert_eq!(config.embeddings.provider, EmbeddingProvider::Remote);
        Ok(())
    });
}

#[test]
fn prefixed_env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".deepcite")?;
        jail.create_file(
            ".deepcite/config.toml",
            r#"
[research]
reduced_fetch = false
max_iterations = 5
"#,
        )?;
        jail.set_env("DEEPCITE_RESEARCH__REDUCED_FETCH", "true");
        jail.set_env("DEEPCITE_FETCH__MAX_BYTES", "1024");

        let config = CiteConfig::load().expect("config loads");
        assert!(config.research.reduced_fetch);
        assert_eq!(config.research.max_iterations, 5);
        assert_eq!(config.fetch.max_bytes, 1024);
        Ok(())
    });
}

#[test]
fn conventional_credential_vars_fill_keys() {
    Jail::expect_with(|jail| {
        jail.set_env("OPENAI_API_KEY", "sk-conventional");
        jail.set_env("SERPAPI_KEY", "serp-conventional");

        let config = CiteConfig::load().expect("config loads");
        assert_eq!(config.llm.api_key, "sk-conventional");
        assert_eq!(config.search.serpapi_key, "serp-conventional");
        assert!(config.search.is_configured());
        Ok(())
    });
}

#[test]
fn prefixed_credential_beats_conventional() {
    Jail::expect_with(|jail| {
        jail.set_env("OPENAI_API_KEY", "sk-conventional");
        jail.set_env("DEEPCITE_LLM__API_KEY", "sk-prefixed");

        let config = CiteConfig::load().expect("config loads");
        assert_eq!(config.llm.api_key, "sk-prefixed");
        Ok(())
    });
}

#[test]
fn inconsistent_chunking_is_rejected_on_load() {
    Jail::expect_with(|jail| {
        jail.set_env("DEEPCITE_RESEARCH__CHUNK_WINDOW", "100");
        jail.set_env("DEEPCITE_RESEARCH__CHUNK_OVERLAP", "100");

        let err = CiteConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        Ok(())
    });
}
