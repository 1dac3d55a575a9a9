//! Removing `<@U…>` user mentions from message text.

use once_cell::sync::Lazy;
use regex::Regex;

static ANY_USER_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<@U[A-Z0-9]+>").expect("valid mention regex"));

/// Strips the bot's mention from text. Until the bot's own user id is known,
/// any user mention is stripped, but none is reported as the bot's.
pub struct MentionStripper {
    bot_mention: Option<String>,
}

impl MentionStripper {
    pub fn new(bot_user_id: Option<&str>) -> Self {
        Self {
            bot_mention: bot_user_id
                .filter(|id| !id.is_empty())
                .map(|id| format!("<@{id}>")),
        }
    }

    /// Text with the mention removed and surrounding whitespace trimmed.
    pub fn strip(&self, text: &str) -> String {
        match &self.bot_mention {
            Some(mention) => text.replace(mention.as_str(), ""),
            None => ANY_USER_MENTION.replace_all(text, "").into_owned(),
        }
        .trim()
        .to_string()
    }

    /// Whether `text` mentions the bot. Always false while the bot id is unknown.
    pub fn mentions_bot(&self, text: &str) -> bool {
        self.bot_mention
            .as_deref()
            .is_some_and(|mention| text.contains(mention))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_known_bot_only() {
        let stripper = MentionStripper::new(Some("UBOT1"));
        assert_eq!(stripper.strip("<@UBOT1> hola <@U2OTHER>"), "hola <@U2OTHER>");
        assert!(stripper.mentions_bot("hey <@UBOT1>"));
        assert!(!stripper.mentions_bot("hey <@U2OTHER>"));
    }

    #[test]
    fn strips_any_user_when_bot_unknown() {
        let stripper = MentionStripper::new(None);
        assert_eq!(stripper.strip("  <@U12AB> ¿cómo reinicio la VPN?  "), "¿cómo reinicio la VPN?");
        assert!(!stripper.mentions_bot("<@U12AB> mira esto"));
    }

    #[test]
    fn mention_only_text_is_empty() {
        assert_eq!(MentionStripper::new(Some("UBOT")).strip("<@UBOT>"), "");
        assert_eq!(MentionStripper::new(Some("")).strip("<@UX1>"), "");
    }
}
