//! Config redaction: produce safe-to-log config snapshots by masking secrets.

use serde_json::Value;

use crate::schema::RecallConfig;

/// Keys whose string values are secrets.
static SENSITIVE_KEYS: &[&str] = &["botToken", "signingSecret", "apiKey"];

/// Redact a config, replacing every secret with a short hint.
pub fn redact(config: &RecallConfig) -> Value {
    let value = serde_json::to_value(config).unwrap_or(Value::Null);
    redact_recursive(&value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str) -> Value {
    // Preserve length hint: show first 4 chars + ***
    let hint = match s.char_indices().nth(4) {
        Some((idx, _)) => format!("{}***", &s[..idx]),
        None => "***".to_string(),
    };
    Value::String(hint)
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) && !s.is_empty() => redact_string(s),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_recursive(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}
