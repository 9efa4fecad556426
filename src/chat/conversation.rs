//! Transient chat state: messages, the welcome turn and quick suggestions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::matcher::IntentMatcher;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    User,
    Bot,
}

/// One chat bubble. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub origin: Origin,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Origin::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Origin::Bot, text)
    }

    fn new(origin: Origin, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Shortcut buttons offered under the greeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suggestion {
    Services,
    Quote,
    ContactInfo,
    Faq,
}

impl Suggestion {
    pub const ALL: [Suggestion; 4] = [
        Suggestion::Services,
        Suggestion::Quote,
        Suggestion::ContactInfo,
        Suggestion::Faq,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Services => "Voir nos services",
            Self::Quote => "Demander un devis",
            Self::ContactInfo => "Informations contact",
            Self::Faq => "FAQ",
        }
    }

    /// The question sent on the visitor's behalf. `Faq` only navigates the page.
    pub fn prompt(self) -> Option<&'static str> {
        match self {
            Self::Services => Some("Quels sont vos services ?"),
            Self::Quote => Some("Comment obtenir un devis ?"),
            Self::ContactInfo => Some("Comment vous contacter ?"),
            Self::Faq => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

/// One visitor's conversation with the bot.
#[derive(Debug, Clone)]
pub struct Conversation {
    matcher: IntentMatcher,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Open a conversation seeded with the greeting.
    pub fn open(matcher: IntentMatcher) -> Self {
        let greeting = ChatMessage::bot(matcher.knowledge().greeting.clone());
        Self {
            matcher,
            messages: vec![greeting],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Suggestions are shown only until the visitor says something.
    pub fn suggestions(&self) -> &'static [Suggestion] {
        let all: &'static [Suggestion] = &Suggestion::ALL;
        if self.messages.len() == 1 { all } else { &[] }
    }

    /// Record a user turn and the bot's answer. Blank input is ignored.
    pub fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let reply = self.matcher.respond(text).to_string();
        self.messages.push(ChatMessage::user(text));
        self.messages.push(ChatMessage::bot(reply));
        self.messages.last()
    }

    /// Act on a suggestion button. `Faq` produces no turn.
    pub fn choose(&mut self, suggestion: Suggestion) -> Option<&ChatMessage> {
        let prompt = suggestion.prompt()?;
        self.send(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::knowledge::{DEFAULT_FALLBACK, DEFAULT_GREETING, DELIVERY_RESPONSE};

    #[test]
    fn open_seeds_greeting() {
        let conv = Conversation::open(IntentMatcher::default());
        assert_eq!(conv.messages().len(), 1);
        assert_eq!(conv.messages()[0].origin, Origin::Bot);
        assert_eq!(conv.messages()[0].text, DEFAULT_GREETING);
        assert_eq!(conv.suggestions().len(), 4);
    }

    #[test]
    fn send_appends_user_then_bot() {
        let mut conv = Conversation::open(IntentMatcher::default());
        let reply = conv.send("  Délai de livraison ?  ").unwrap();
        assert_eq!(reply.origin, Origin::Bot);
        assert_eq!(reply.text, DELIVERY_RESPONSE);

        let msgs = conv.messages();
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[1].origin, Origin::User);
        assert_eq!(msgs[1].text, "Délai de livraison ?");
        assert!(conv.suggestions().is_empty());
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut conv = Conversation::open(IntentMatcher::default());
        assert!(conv.send("   ").is_none());
        assert!(conv.send("").is_none());
        assert_eq!(conv.messages().len(), 1);
    }

    #[test]
    fn suggestions_send_their_prompt() {
        let mut conv = Conversation::open(IntentMatcher::default());
        let reply = conv.choose(Suggestion::Services).unwrap();
        assert_eq!(reply.text, DEFAULT_FALLBACK);
        assert_eq!(conv.messages()[1].text, "Quels sont vos services ?");
    }

    #[test]
    fn faq_suggestion_produces_no_turn() {
        let mut conv = Conversation::open(IntentMatcher::default());
        assert!(conv.choose(Suggestion::Faq).is_none());
        assert_eq!(conv.messages().len(), 1);
    }

    #[test]
    fn suggestion_labels_round_trip() {
        for s in Suggestion::ALL {
            assert_eq!(Suggestion::from_label(s.label()), Some(s));
        }
        assert_eq!(Suggestion::from_label("Nope"), None);
    }

    #[test]
    fn message_serializes_origin_lowercase() {
        let msg = ChatMessage::user("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["origin"], "user");
        assert_eq!(json["text"], "hi");
    }
}
