//! Typed configuration schema.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Root configuration for the Recall bot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallConfig {
    pub server: ServerSettings,
    pub slack: SlackSettings,
    pub bedrock: BedrockSettings,
    pub store: StoreSettings,
    pub threads: ThreadSettings,
    pub logging: LoggingSettings,
    /// Legacy env vars the config was loaded from. Reported as validation
    /// warnings, which are logged once the subscriber is installed.
    #[serde(skip)]
    pub deprecated_env: Vec<&'static str>,
}

/// HTTP listener for the Slack webhooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    pub bind_address: String,
    pub port: u16,
    /// Events API request URL path.
    pub events_path: String,
    /// Interactivity request URL path.
    pub interactions_path: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: defaults::DEFAULT_BIND_ADDRESS.to_string(),
            port: defaults::DEFAULT_PORT,
            events_path: defaults::DEFAULT_EVENTS_PATH.to_string(),
            interactions_path: defaults::DEFAULT_INTERACTIONS_PATH.to_string(),
        }
    }
}

/// Slack app credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackSettings {
    pub bot_token: Option<String>,
    pub signing_secret: Option<String>,
    /// Bot user id (`U...`); resolved with `auth.test` when absent.
    pub bot_user_id: Option<String>,
}

/// AWS Bedrock runtime access for generation and embeddings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BedrockSettings {
    pub region: String,
    /// Overrides `https://bedrock-runtime.{region}.amazonaws.com`.
    pub endpoint: Option<String>,
    /// Bedrock API key, sent as a bearer token.
    pub api_key: Option<String>,
    pub model_id: String,
    pub embed_model_id: String,
}

impl BedrockSettings {
    /// The runtime endpoint, honoring the override.
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", self.region))
    }
}

impl Default for BedrockSettings {
    fn default() -> Self {
        Self {
            region: defaults::DEFAULT_REGION.to_string(),
            endpoint: None,
            api_key: None,
            model_id: defaults::DEFAULT_MODEL_ID.to_string(),
            embed_model_id: defaults::DEFAULT_EMBED_MODEL_ID.to_string(),
        }
    }
}

/// Distance metric of the document collection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DistanceSetting {
    /// Squared euclidean distance.
    #[default]
    L2,
    /// `1 - cosine similarity`.
    Cosine,
}

impl FromStr for DistanceSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l2" => Ok(Self::L2),
            "cosine" => Ok(Self::Cosine),
            other => Err(format!("unknown distance metric '{other}' (expected l2 or cosine)")),
        }
    }
}

/// Stop-word list used by the keyword extractor.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StopWordSetting {
    #[default]
    Spanish,
    English,
}

impl FromStr for StopWordSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spanish" | "es" => Ok(Self::Spanish),
            "english" | "en" => Ok(Self::English),
            other => Err(format!("unsupported stop-word language '{other}'")),
        }
    }
}

impl fmt::Display for StopWordSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spanish => write!(f, "spanish"),
            Self::English => write!(f, "english"),
        }
    }
}

/// Persistent document collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    pub db_path: String,
    pub collection: String,
    pub distance: DistanceSetting,
    /// Largest distance a retrieved document may have and still be used.
    pub max_distance: f32,
    pub stop_words: StopWordSetting,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            db_path: defaults::DEFAULT_DB_PATH.to_string(),
            collection: defaults::DEFAULT_COLLECTION.to_string(),
            distance: DistanceSetting::default(),
            max_distance: defaults::DEFAULT_MAX_DISTANCE,
            stop_words: StopWordSetting::default(),
        }
    }
}

/// Bounds of the per-thread state cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSettings {
    /// Idle time after which a thread falls back to inactive.
    pub ttl_secs: u64,
    pub max_threads: u64,
}

impl Default for ThreadSettings {
    fn default() -> Self {
        Self {
            ttl_secs: defaults::DEFAULT_THREAD_TTL_SECS,
            max_threads: defaults::DEFAULT_MAX_THREADS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingSettings {
    pub level: String,
    pub log_dir: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: defaults::DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_defaults_to_regional_runtime() {
        let bedrock = BedrockSettings::default();
        assert_eq!(
            bedrock.endpoint_url(),
            "https://bedrock-runtime.us-east-1.amazonaws.com"
        );
    }

    #[test]
    fn endpoint_override_wins() {
        let bedrock = BedrockSettings {
            endpoint: Some("http://localhost:9000".into()),
            ..Default::default()
        };
        assert_eq!(bedrock.endpoint_url(), "http://localhost:9000");
    }

    #[test]
    fn parses_distance_and_language() {
        assert_eq!("COSINE".parse::<DistanceSetting>().unwrap(), DistanceSetting::Cosine);
        assert!("manhattan".parse::<DistanceSetting>().is_err());
        assert_eq!("en".parse::<StopWordSetting>().unwrap(), StopWordSetting::English);
    }
}
