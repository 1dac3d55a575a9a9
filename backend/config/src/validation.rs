//! Config validation with field paths and user-friendly messages.

use crate::env::{LEGACY_MAX_DISTANCE_VAR, MAX_DISTANCE_VAR};
use crate::schema::RecallConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &RecallConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_slack(config, &mut report);
    validate_bedrock(config, &mut report);
    validate_store(config, &mut report);
    validate_threads(config, &mut report);
    validate_deprecations(config, &mut report);
    report
}

fn validate_deprecations(config: &RecallConfig, report: &mut ValidationReport) {
    for var in &config.deprecated_env {
        if *var == LEGACY_MAX_DISTANCE_VAR {
            report.warn(
                "store.maxDistance",
                format!("{var} is deprecated; set {MAX_DISTANCE_VAR} to the retrieval distance cutoff instead"),
            );
        } else {
            report.warn("env", format!("{var} is deprecated"));
        }
    }
}

fn validate_server(config: &RecallConfig, report: &mut ValidationReport) {
    let server = &config.server;
    for (path, value) in [
        ("server.eventsPath", &server.events_path),
        ("server.interactionsPath", &server.interactions_path),
    ] {
        if !value.starts_with('/') {
            report.error(path, "Webhook path must start with '/'");
        }
    }
    if server.events_path == server.interactions_path {
        report.error(
            "server.interactionsPath",
            "Events and interactions need distinct paths",
        );
    }
}

/// Slack credentials are only needed by `serve`, so their absence is a warning.
fn validate_slack(config: &RecallConfig, report: &mut ValidationReport) {
    if config.slack.bot_token.is_none() {
        report.warn("slack.botToken", "SLACK_BOT_TOKEN is not set; `serve` will refuse to start");
    }
    if config.slack.signing_secret.is_none() {
        report.warn(
            "slack.signingSecret",
            "SLACK_SIGNING_SECRET is not set; `serve` will refuse to start",
        );
    }
}

fn validate_bedrock(config: &RecallConfig, report: &mut ValidationReport) {
    let bedrock = &config.bedrock;
    if bedrock.model_id.trim().is_empty() {
        report.error("bedrock.modelId", "Generation model id cannot be empty");
    }
    if bedrock.embed_model_id.trim().is_empty() {
        report.error("bedrock.embedModelId", "Embedding model id cannot be empty");
    }
    if bedrock.api_key.is_none() {
        report.warn(
            "bedrock.apiKey",
            "AWS_BEARER_TOKEN_BEDROCK is not set; requests are sent unauthenticated",
        );
    }
}

fn validate_store(config: &RecallConfig, report: &mut ValidationReport) {
    let store = &config.store;
    if store.db_path.trim().is_empty() {
        report.error("store.dbPath", "Database path cannot be empty");
    }
    if store.collection.trim().is_empty() {
        report.error("store.collection", "Collection name cannot be empty");
    }
    if !store.max_distance.is_finite() || store.max_distance < 0.0 {
        report.error(
            "store.maxDistance",
            format!("Distance cutoff must be a non-negative number, got {}", store.max_distance),
        );
    } else if store.max_distance == 0.0 {
        report.warn("store.maxDistance", "A cutoff of 0 only accepts exact duplicates");
    }
}

fn validate_threads(config: &RecallConfig, report: &mut ValidationReport) {
    if config.threads.ttl_secs == 0 {
        report.error("threads.ttlSecs", "Thread TTL must be at least one second");
    }
    if config.threads.max_threads == 0 {
        report.error("threads.maxThreads", "Thread cache capacity must be positive");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> RecallConfig {
        let mut config = RecallConfig::default();
        config.slack.bot_token = Some("xoxb-1".into());
        config.slack.signing_secret = Some("secret".into());
        config.bedrock.api_key = Some("key".into());
        config
    }

    #[test]
    fn fully_configured_is_clean() {
        let report = validate(&configured());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn missing_slack_only_warns() {
        let report = validate(&RecallConfig::default());
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.path == "slack.botToken"));
    }

    #[test]
    fn negative_cutoff_is_an_error() {
        let mut config = configured();
        config.store.max_distance = -0.5;
        let report = validate(&config);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "store.maxDistance");
    }

    #[test]
    fn legacy_cutoff_var_is_reported_as_a_warning() {
        let mut config = configured();
        config.deprecated_env.push(LEGACY_MAX_DISTANCE_VAR);
        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "store.maxDistance");
        assert!(report.warnings[0].message.contains("RECALL_MAX_DISTANCE"));
    }

    #[test]
    fn clashing_webhook_paths_are_rejected() {
        let mut config = configured();
        config.server.interactions_path = config.server.events_path.clone();
        assert!(!validate(&config).is_valid());
    }
}
