//! CRAG package classifier
//!
//! Classifies software packages as malicious or benign with an LLM, using
//! evidence retrieved from pgvector collections:
//! - Two-source CRAG runs (YARA rules and advisories) with a two-stage
//!   relevance filter
//! - Single-source RAG runs without grading
//! - A zero-shot baseline with no retrieval
//! - Resumable CSV results and an offline accuracy report

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use tracing::info;

use config::CollectionConfig;
use domain::classification::{PackageClassifier, PromptVariant};
use domain::crag::ContextProvider;
use domain::dataset::SnippetPolicy;
use domain::evidence::{validate_top_k, EvidenceSource, EvidenceStore, EvidenceStoreId};
use domain::EmbeddingProvider;
use infrastructure::{
    classification::LlmPackageClassifier,
    crag::{CragPipeline, LlmRelevanceGrader, LlmRelevanceLevelGrader, SimpleRagPipeline},
    dataset::JsonDatasetLoader,
    embedding::{HttpClient, OpenAiEmbeddingProvider},
    evidence::{connect_pool, PgvectorCollection, PgvectorEvidenceStore},
    llm::{LlmBackend, LlmProviderFactory},
    results::CsvResultsRepository,
    services::EvaluationService,
};

/// Backend clients shared by every pipeline of a run
#[derive(Debug, Clone)]
pub struct Clients {
    pub llm: LlmBackend,
    pub model: String,
    pub embedding: Arc<dyn EmbeddingProvider>,
    pub pool: PgPool,
}

/// Read an environment variable that must be set and non-blank
fn required_env(name: &str) -> anyhow::Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => anyhow::bail!("{} environment variable is required", name),
    }
}

/// Build the chat backend and resolve the classification model
pub fn create_llm(config: &AppConfig) -> anyhow::Result<(LlmBackend, String)> {
    let api_key_env = config.llm.provider.api_key_env();
    let api_key = required_env(api_key_env).context("Chat backend API key is missing")?;
    let llm = LlmProviderFactory::create(&config.llm.provider, &api_key, config.llm.timeout_secs)?;
    let model = config.llm.model();
    info!(provider = llm.provider.provider_name(), model = %model, "LLM backend ready");

    Ok((llm, model))
}

/// Build the chat, embedding and database clients from configuration and
/// the environment
pub async fn create_clients(config: &AppConfig) -> anyhow::Result<Clients> {
    let (llm, model) = create_llm(config)?;

    let openai_key = required_env("OPENAI_API_KEY").context("Embeddings need an OpenAI API key")?;
    let http_client = HttpClient::from_timeout_secs(config.llm.timeout_secs)?;
    let embedding: Arc<dyn EmbeddingProvider> = match config.embedding.base_url {
        Some(ref base_url) => Arc::new(OpenAiEmbeddingProvider::with_base_url(
            http_client,
            openai_key,
            base_url,
        )),
        None => Arc::new(OpenAiEmbeddingProvider::new(http_client, openai_key)),
    };

    let database_url = required_env("DATABASE_URL")?;
    info!("Connecting to PostgreSQL...");
    let pool = connect_pool(
        &database_url,
        config.vector_store.max_connections,
        config.vector_store.connect_timeout_secs,
    )
    .await?;
    info!("PostgreSQL connection established");

    Ok(Clients {
        llm,
        model,
        embedding,
        pool,
    })
}

fn evidence_source(
    config: &AppConfig,
    clients: &Clients,
    id: &str,
    collection: &CollectionConfig,
    top_k: u32,
) -> anyhow::Result<EvidenceSource> {
    validate_top_k(top_k).with_context(|| format!("Invalid top_k for {}", collection.label))?;

    let mut store_config =
        PgvectorCollection::new(&collection.collection, &config.embedding.model)
            .with_distance_metric(config.vector_store.distance_metric);
    if let Some(ref schema) = config.vector_store.schema {
        store_config = store_config.with_schema(schema);
    }

    let store: Arc<dyn EvidenceStore> = Arc::new(PgvectorEvidenceStore::new(
        EvidenceStoreId::new(id)?,
        clients.pool.clone(),
        store_config,
        clients.embedding.clone(),
    )?);

    Ok(EvidenceSource::new(store, &collection.label, top_k))
}

/// Two-source CRAG pipeline over the YARA rule and advisory collections
pub fn create_crag_pipeline(config: &AppConfig, clients: &Clients) -> anyhow::Result<CragPipeline> {
    let evidence = &config.evidence;
    let yara = evidence_source(
        config,
        clients,
        "yara_rules",
        &evidence.yara_rules,
        evidence.yara_rules.top_k,
    )?;
    let advisories = evidence_source(
        config,
        clients,
        "advisories",
        &evidence.advisories,
        evidence.advisories.top_k,
    )?;

    let grading_model = config
        .crag
        .grading_model
        .clone()
        .unwrap_or_else(|| clients.model.clone());

    let grader = LlmRelevanceGrader::new(
        clients.llm.provider.clone(),
        &grading_model,
        clients.llm.style,
        config.crag.clone(),
    );
    let level_grader = LlmRelevanceLevelGrader::new(
        clients.llm.provider.clone(),
        &grading_model,
        clients.llm.style,
        config.crag.clone(),
    );

    Ok(CragPipeline::new(
        yara,
        advisories,
        Arc::new(grader),
        Arc::new(level_grader),
        config.crag.clone(),
    ))
}

/// Ungraded pipeline over a single collection
pub fn create_simple_rag_pipeline(
    config: &AppConfig,
    clients: &Clients,
    id: &str,
    collection: &CollectionConfig,
) -> anyhow::Result<SimpleRagPipeline> {
    let source = evidence_source(config, clients, id, collection, collection.simple_rag_top_k)?;
    Ok(SimpleRagPipeline::new(source, &collection.description))
}

pub fn create_classifier(
    config: &AppConfig,
    llm: &LlmBackend,
    model: &str,
    prompt: PromptVariant,
) -> Arc<dyn PackageClassifier> {
    Arc::new(
        LlmPackageClassifier::new(llm.provider.clone(), model, llm.style)
            .with_prompt(prompt)
            .with_parse_mode(config.classification.parse_mode)
            .with_temperature(config.llm.temperature),
    )
}

/// Wire a run: dataset, context pipeline, classifier and results file.
/// `policy` shapes snippets unless the configuration overrides it.
pub fn create_evaluation_service(
    config: &AppConfig,
    context: Arc<dyn ContextProvider>,
    classifier: Arc<dyn PackageClassifier>,
    result_file: &Path,
    policy: SnippetPolicy,
) -> EvaluationService {
    let dataset = JsonDatasetLoader::new(&config.dataset.malicious_path, &config.dataset.benign_path)
        .with_policy(config.dataset.snippet_policy.unwrap_or(policy))
        .with_seed(config.dataset.seed);

    EvaluationService::new(
        Arc::new(dataset),
        context,
        classifier,
        Arc::new(CsvResultsRepository::new(result_file)),
    )
}
