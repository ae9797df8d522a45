//! Conversation engine: per-request orchestration over the knowledge
//! store, history buffer, answer provider, and emotion pipeline.
//!
//! Flow per utterance: normalize and look up in the knowledge base; on a
//! miss, build provider context from history (when enabled), delegate to
//! the external answer provider, learn the result when the question passes
//! the store gate, and always produce a non-empty answer. Emotion
//! classification runs independently on the raw input and never influences
//! retrieval or learning.

use crate::emotion::{CannedResponder, EmotionClassifier};
use crate::history::{HistoryBuffer, Speaker};
use crate::knowledge::{should_store, KnowledgeStore};
use crate::shared::{ChatReply, PluginFlags};
use std::sync::{Arc, Mutex, RwLock};

/// Fixed reply when neither the knowledge base nor the provider has an
/// answer. The engine never returns an empty response.
pub const FALLBACK_ANSWER: &str = "I don't have an answer for that.";

/// External answer source consulted on a knowledge-base miss.
///
/// Implementations own their transport (HTTP call, driven browser, …) and
/// any retry policy. The engine treats every failure as "no answer" and
/// never retries.
#[async_trait::async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Provider name for logging and routing.
    fn name(&self) -> &str;

    /// Resolves `context` to an answer; `Ok(None)` means the provider had
    /// nothing.
    async fn query(
        &self,
        context: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;
}

/// One engine instance owns all conversational state: the knowledge store
/// behind a read/write lock (lookups are read-mostly, learns exclusive)
/// and the history buffer behind a mutex. Construct once at process start
/// and share by `Arc`; there is no ambient global state.
pub struct ConversationEngine {
    knowledge: RwLock<KnowledgeStore>,
    history: Mutex<HistoryBuffer>,
    provider: Arc<dyn AnswerProvider>,
    classifier: EmotionClassifier,
    responder: CannedResponder,
}

impl ConversationEngine {
    /// Engine with the seeded default knowledge base.
    pub fn new(provider: Arc<dyn AnswerProvider>) -> Self {
        Self::with_parts(
            KnowledgeStore::new(),
            provider,
            EmotionClassifier::new(),
            CannedResponder::new(),
        )
    }

    pub fn with_parts(
        knowledge: KnowledgeStore,
        provider: Arc<dyn AnswerProvider>,
        classifier: EmotionClassifier,
        responder: CannedResponder,
    ) -> Self {
        Self {
            knowledge: RwLock::new(knowledge),
            history: Mutex::new(HistoryBuffer::new()),
            provider,
            classifier,
            responder,
        }
    }

    /// Number of stored knowledge entries (for status reporting).
    pub fn knowledge_len(&self) -> usize {
        self.knowledge.read().map(|kb| kb.len()).unwrap_or(0)
    }

    /// Resolves one utterance. Total: always yields a non-empty response.
    pub async fn chat(&self, message: &str, plugins: PluginFlags) -> ChatReply {
        let stored = self
            .knowledge
            .read()
            .ok()
            .and_then(|kb| kb.lookup(message).map(str::to_string));

        let response = match stored {
            Some(answer) => {
                if plugins.history {
                    if let Ok(mut history) = self.history.lock() {
                        history.append(Speaker::User, message);
                        history.append(Speaker::Bot, &answer);
                        history.trim();
                    }
                }
                answer
            }
            None => self.resolve_externally(message, plugins.history).await,
        };

        let (emotion, emotion_response) = if plugins.emotion {
            let category = self.classifier.classify(message);
            (Some(category), Some(self.responder.respond(category)))
        } else {
            (None, None)
        };

        ChatReply {
            response,
            emotion,
            emotion_response,
        }
    }

    /// Knowledge-base miss path: provider delegation, learn gate, history
    /// bookkeeping, fixed fallback.
    async fn resolve_externally(&self, message: &str, history_enabled: bool) -> String {
        // Build the provider context under the history lock, then release
        // it: the provider call blocks on I/O and must not hold any engine
        // lock across its await.
        let context = if history_enabled {
            self.history
                .lock()
                .map(|mut history| {
                    history.append(Speaker::User, message);
                    history.render()
                })
                .unwrap_or_else(|_| message.to_string())
        } else {
            message.to_string()
        };

        let answer = match self.provider.query(&context).await {
            Ok(found) => found,
            Err(error) => {
                tracing::warn!(
                    target: "intelix::engine",
                    provider = self.provider.name(),
                    error = %error,
                    "answer provider failed; treating as no answer"
                );
                None
            }
        };

        if let Some(ref answer) = answer {
            if should_store(message) {
                if let Ok(mut knowledge) = self.knowledge.write() {
                    knowledge.learn(message, answer);
                }
            }
        }

        let response = answer.unwrap_or_else(|| FALLBACK_ANSWER.to_string());

        if history_enabled {
            if let Ok(mut history) = self.history.lock() {
                history.append(Speaker::Bot, &response);
                history.trim();
            }
        }

        response
    }
}
