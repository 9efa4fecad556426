//! Keyword intent matcher.
//!
//! Case-folds the query and returns the response of the first topic (in
//! declaration order) that has any keyword contained in it. Queries that hit
//! nothing, the empty string included, get the fallback response.

use std::sync::Arc;

use tracing::debug;

use super::knowledge::{KnowledgeBase, Topic};

/// Maps free text to a canned response.
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    knowledge: Arc<KnowledgeBase>,
}

impl IntentMatcher {
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self {
            knowledge: Arc::new(knowledge),
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// The first matching topic, if any.
    pub fn classify(&self, query: &str) -> Option<&Topic> {
        let normalized = query.to_lowercase();
        self.knowledge.topics.iter().find(|topic| {
            topic
                .keywords
                .iter()
                .any(|keyword| normalized.contains(keyword.as_str()))
        })
    }

    /// Answer a query. Total over all inputs.
    pub fn respond(&self, query: &str) -> &str {
        match self.classify(query) {
            Some(topic) => {
                debug!(topic = %topic.key, "Chat query matched topic");
                &topic.response
            }
            None => {
                debug!("Chat query matched no topic, using fallback");
                &self.knowledge.fallback
            }
        }
    }
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new(KnowledgeBase::builtin())
    }
}
