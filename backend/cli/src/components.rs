//! Builds the runtime components from a loaded `RecallConfig`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use recall_config::{DistanceSetting, RecallConfig, StopWordSetting};
use recall_core::RecallError;
use recall_memory::{
    BedrockCohereEmbeddings, Collection, DistanceMetric, DocumentStore, SqliteVecStore,
    StopWordLanguage,
};
use recall_planner::{BedrockProvider, TextGenerator};
use recall_agent::QueryPipeline;

pub fn distance_metric(setting: DistanceSetting) -> DistanceMetric {
    match setting {
        DistanceSetting::L2 => DistanceMetric::L2,
        DistanceSetting::Cosine => DistanceMetric::Cosine,
    }
}

pub fn stop_words(setting: StopWordSetting) -> StopWordLanguage {
    match setting {
        StopWordSetting::Spanish => StopWordLanguage::Spanish,
        StopWordSetting::English => StopWordLanguage::English,
    }
}

/// Bot token and signing secret, both required by `serve`.
pub fn slack_credentials(config: &RecallConfig) -> Result<(String, String), RecallError> {
    let bot_token = config
        .slack
        .bot_token
        .clone()
        .ok_or_else(|| RecallError::Config("SLACK_BOT_TOKEN must be set to serve".into()))?;
    let signing_secret = config
        .slack
        .signing_secret
        .clone()
        .ok_or_else(|| RecallError::Config("SLACK_SIGNING_SECRET must be set to serve".into()))?;
    Ok((bot_token, signing_secret))
}

pub fn document_store(config: &RecallConfig) -> Result<Arc<DocumentStore>> {
    let store = SqliteVecStore::open(
        &config.store.db_path,
        config.store.collection.clone(),
        distance_metric(config.store.distance),
    )
    .with_context(|| format!("Failed to open document store at {}", config.store.db_path))?;

    let embedder = BedrockCohereEmbeddings::new(
        config.bedrock.endpoint_url(),
        config.bedrock.embed_model_id.clone(),
        config.bedrock.api_key.clone(),
    );

    let collection = Collection::new(config.store.collection.clone(), Arc::new(embedder), Arc::new(store));
    info!(
        collection = %config.store.collection,
        db = %config.store.db_path,
        distance = ?config.store.distance,
        "Document store ready"
    );
    Ok(Arc::new(DocumentStore::new(collection, stop_words(config.store.stop_words))))
}

pub fn text_generator(config: &RecallConfig) -> Arc<TextGenerator> {
    let provider = BedrockProvider::new(config.bedrock.endpoint_url(), config.bedrock.api_key.clone());
    Arc::new(TextGenerator::new(Arc::new(provider), config.bedrock.model_id.clone()))
}

pub fn query_pipeline(config: &RecallConfig) -> Result<Arc<QueryPipeline>> {
    Ok(Arc::new(QueryPipeline::new(
        document_store(config)?,
        text_generator(config),
        config.store.max_distance,
    )))
}
