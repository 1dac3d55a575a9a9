//! `recall-config`: runtime configuration for the Recall bot.
//!
//! Provides:
//! - Typed config schema (Slack, Bedrock, vector store, thread cache, logging)
//! - Loading from the process environment (with optional `.env`) or a map
//! - Default values
//! - Validation report
//! - Redaction for safe logging/display

pub mod defaults;
pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use env::{from_env, from_env_map, ConfigError};
pub use redact::redact;
pub use schema::{
    BedrockSettings, DistanceSetting, LoggingSettings, RecallConfig, ServerSettings,
    SlackSettings, StopWordSetting, StoreSettings, ThreadSettings,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::Result;

/// Log the validation report of a loaded config.
///
/// Errors in the report are returned so the binary refuses to start
/// half-configured; warnings are only logged.
pub fn ensure_valid(config: &RecallConfig) -> Result<()> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        return Err(first.into());
    }

    tracing::debug!(config = %redact(config), "Configuration loaded");
    Ok(())
}
