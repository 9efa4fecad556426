//! Rule-based chat assistant.

pub mod cli;
pub mod conversation;
pub mod knowledge;
pub mod matcher;
pub mod routes;

pub use conversation::{ChatMessage, Conversation, Origin, Suggestion};
pub use knowledge::{KnowledgeBase, Topic};
pub use matcher::IntentMatcher;
pub use routes::chat_routes;
