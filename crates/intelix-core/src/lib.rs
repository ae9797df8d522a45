//! intelix-core: conversational QA engine.
//!
//! Resolves user utterances against a small, dynamically growing in-memory
//! knowledge base before falling back to an external answer source:
//! text normalization, fuzzy similarity scoring, learn-on-fallback
//! knowledge growth, bounded conversational history, and emotion
//! classification feeding canned responses.

mod emotion;
mod engine;
mod history;
mod knowledge;
mod normalize;
mod shared;
mod similarity;

// Shared types
pub use shared::{ChatReply, CoreConfig, PluginFlags};

// Normalization
pub use normalize::{Lemmatizer, Normalizer, LEMMA_CACHE_CAPACITY};

// Similarity scoring
pub use similarity::{SimilarityScorer, MATCH_THRESHOLD};

// Knowledge base
pub use knowledge::{should_store, KnowledgeEntry, KnowledgeStore, MAX_ANSWER_CHARS, STORE_KEYWORDS};

// Conversational history
pub use history::{HistoryBuffer, Speaker, HISTORY_CHUNK_WORDS, HISTORY_WORD_LIMIT};

// Emotion pipeline
pub use emotion::{
    CannedResponder, EmotionCategory, EmotionClassifier, LexiconAnalyzer, SentimentAnalyzer,
};

// Engine
pub use engine::{AnswerProvider, ConversationEngine, FALLBACK_ANSWER};
