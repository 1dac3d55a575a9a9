//! Slack Block Kit builders
//!
//! The bot's only rich message is the yes/no feedback prompt.

use serde_json::{Value, json};

pub const ACTION_YES: &str = "response_yes";
pub const ACTION_NO: &str = "response_no";

pub const FEEDBACK_PROMPT: &str = "¿Te sirvió mi respuesta?";

/// A `section` block with markdown text.
pub fn text_section(text: &str) -> Value {
    json!({
        "type": "section",
        "text": { "type": "mrkdwn", "text": text }
    })
}

/// An `actions` block of plain-text buttons, one per `(label, action_id, value)`.
pub fn action_buttons(buttons: &[(&str, &str, &str)]) -> Value {
    let elements: Vec<Value> = buttons
        .iter()
        .map(|(label, action_id, value)| {
            json!({
                "type": "button",
                "text": { "type": "plain_text", "text": label },
                "action_id": action_id,
                "value": value
            })
        })
        .collect();
    json!({ "type": "actions", "elements": elements })
}

/// Blocks for the "did this help?" prompt sent when a user says thanks.
pub fn feedback_prompt() -> Value {
    json!([
        text_section(FEEDBACK_PROMPT),
        action_buttons(&[("Sí", ACTION_YES, "yes"), ("No", ACTION_NO, "no")]),
    ])
}
