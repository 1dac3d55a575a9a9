//! Environment-variable loading.
//!
//! Every setting has a default except the Slack credentials, which are only
//! needed by `serve`. Empty variables count as unset.

use std::collections::HashMap;
use std::str::FromStr;

use crate::schema::RecallConfig;

/// Name of the retrieval cutoff variable.
pub const MAX_DISTANCE_VAR: &str = "RECALL_MAX_DISTANCE";

/// Older name of the cutoff, still honored.
pub const LEGACY_MAX_DISTANCE_VAR: &str = "EMBED_TEMPERATURE";

/// Error returned for unparsable env vars.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for env var \"{var_name}\": {reason}")]
    Invalid {
        var_name: String,
        value: String,
        reason: String,
    },
}

/// Load the config from the process environment, reading `.env` first when present.
pub fn from_env() -> Result<RecallConfig, ConfigError> {
    // A missing .env file is the normal production case.
    let _ = dotenvy::dotenv();
    from_env_map(&std::env::vars().collect())
}

/// Build the config from a provided map (useful for testing).
pub fn from_env_map(env: &HashMap<String, String>) -> Result<RecallConfig, ConfigError> {
    let mut config = RecallConfig::default();

    // Server
    if let Some(bind) = get(env, "RECALL_BIND") {
        config.server.bind_address = bind.to_string();
    }
    if let Some(port) = parse(env, "RECALL_PORT")? {
        config.server.port = port;
    }
    if let Some(path) = get(env, "SLACK_EVENTS_PATH") {
        config.server.events_path = path.to_string();
    }
    if let Some(path) = get(env, "SLACK_INTERACTIONS_PATH") {
        config.server.interactions_path = path.to_string();
    }

    // Slack
    config.slack.bot_token = get(env, "SLACK_BOT_TOKEN").map(String::from);
    config.slack.signing_secret = get(env, "SLACK_SIGNING_SECRET").map(String::from);
    config.slack.bot_user_id = get(env, "SLACK_BOT_USER_ID").map(String::from);

    // Bedrock
    if let Some(region) = get(env, "AWS_REGION") {
        config.bedrock.region = region.to_string();
    }
    config.bedrock.endpoint = get(env, "BEDROCK_ENDPOINT").map(String::from);
    config.bedrock.api_key = get(env, "AWS_BEARER_TOKEN_BEDROCK").map(String::from);
    if let Some(model) = get(env, "BEDROCK_MODEL_ID") {
        config.bedrock.model_id = model.to_string();
    }
    if let Some(model) = get(env, "BEDROCK_EMBED_MODEL_ID") {
        config.bedrock.embed_model_id = model.to_string();
    }

    // Store
    if let Some(path) = get(env, "RECALL_DB_PATH").or_else(|| get(env, "CHROMA_DB_PATH")) {
        config.store.db_path = path.to_string();
    }
    if let Some(collection) = get(env, "RECALL_COLLECTION") {
        config.store.collection = collection.to_string();
    }
    if let Some(distance) = parse(env, "RECALL_DISTANCE")? {
        config.store.distance = distance;
    }
    if let Some(max_distance) = parse(env, MAX_DISTANCE_VAR)? {
        config.store.max_distance = max_distance;
    } else if let Some(max_distance) = parse(env, LEGACY_MAX_DISTANCE_VAR)? {
        config.store.max_distance = max_distance;
        config.deprecated_env.push(LEGACY_MAX_DISTANCE_VAR);
    }
    if let Some(stop_words) = parse(env, "RECALL_STOPWORDS")? {
        config.store.stop_words = stop_words;
    }

    // Threads
    if let Some(ttl) = parse(env, "RECALL_THREAD_TTL_SECS")? {
        config.threads.ttl_secs = ttl;
    }
    if let Some(max) = parse(env, "RECALL_MAX_THREADS")? {
        config.threads.max_threads = max;
    }

    // Logging
    if let Some(level) = get(env, "LOG_LEVEL") {
        config.logging.level = level.to_string();
    }
    config.logging.log_dir = get(env, "RECALL_LOG_DIR").map(String::from);

    Ok(config)
}

fn get<'a>(env: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse<T>(env: &HashMap<String, String>, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = get(env, key) else {
        return Ok(None);
    };
    raw.parse::<T>().map(Some).map_err(|e| ConfigError::Invalid {
        var_name: key.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DistanceSetting, StopWordSetting};

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn empty_env_gives_defaults() {
        let config = from_env_map(&HashMap::new()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.store.max_distance, 1.0);
        assert_eq!(config.store.distance, DistanceSetting::L2);
        assert_eq!(config.store.stop_words, StopWordSetting::Spanish);
        assert!(config.slack.bot_token.is_none());
    }

    #[test]
    fn reads_slack_and_bedrock_settings() {
        let config = from_env_map(&env(&[
            ("SLACK_BOT_TOKEN", "xoxb-1"),
            ("SLACK_SIGNING_SECRET", "s3cret"),
            ("BEDROCK_MODEL_ID", "anthropic.claude-3-haiku"),
            ("BEDROCK_EMBED_MODEL_ID", "cohere.embed-english-v3"),
            ("AWS_REGION", "eu-west-1"),
            ("CHROMA_DB_PATH", "/data/docs.db"),
        ]))
        .unwrap();
        assert_eq!(config.slack.bot_token.as_deref(), Some("xoxb-1"));
        assert_eq!(config.bedrock.model_id, "anthropic.claude-3-haiku");
        assert_eq!(config.bedrock.region, "eu-west-1");
        assert_eq!(config.store.db_path, "/data/docs.db");
    }

    #[test]
    fn new_cutoff_name_wins_over_legacy() {
        let config = from_env_map(&env(&[
            ("RECALL_MAX_DISTANCE", "0.4"),
            ("EMBED_TEMPERATURE", "0.9"),
        ]))
        .unwrap();
        assert_eq!(config.store.max_distance, 0.4);
        assert!(config.deprecated_env.is_empty());
    }

    #[test]
    fn legacy_cutoff_is_still_read() {
        let config = from_env_map(&env(&[("EMBED_TEMPERATURE", "0.75")])).unwrap();
        assert_eq!(config.store.max_distance, 0.75);
        assert_eq!(config.deprecated_env, vec![LEGACY_MAX_DISTANCE_VAR]);
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = from_env_map(&env(&[("SLACK_BOT_TOKEN", "  "), ("RECALL_PORT", "")])).unwrap();
        assert!(config.slack.bot_token.is_none());
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn error_on_unparsable_number() {
        let err = from_env_map(&env(&[("RECALL_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("RECALL_PORT"));
    }
}
