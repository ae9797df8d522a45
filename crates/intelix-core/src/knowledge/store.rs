//! In-memory knowledge store with fuzzy lookup and learn-on-fallback
//! growth.

use crate::normalize::Normalizer;
use crate::similarity::SimilarityScorer;

/// Answers longer than this are compacted before storage.
pub const MAX_ANSWER_CHARS: usize = 200;

/// Default question/answer pairs every store starts with.
const SEED_QA: &[(&str, &str)] = &[
    ("Who owns you?", "I am owned by Rexeloft LLC"),
    ("What is your name?", "My name is Intelix"),
    ("Who created you?", "I was created by Rexeloft LLC"),
    ("Who are you?", "I am Intelix, a conversational assistant"),
    (
        "What can you do?",
        "I can answer questions, learn new facts, and keep track of our conversation",
    ),
    ("How are you?", "I am doing well, thank you for asking"),
    ("What is the capital of India?", "The capital of India is New Delhi"),
    ("Where do you live?", "I live in the cloud, wherever I am deployed"),
    ("How old are you?", "I don't have an age; I was built, not born"),
    ("What language are you written in?", "I am written in Rust"),
];

/// One stored question/answer pair. The key is always the output of the
/// normalizer, so it is stable under renormalization.
#[derive(Debug, Clone)]
pub struct KnowledgeEntry {
    pub normalized_question: String,
    pub answer: String,
}

/// Insertion-ordered mapping from normalized question to answer.
///
/// Order matters: lookup iterates entries in insertion order so the
/// scorer's first-max tie-break stays reproducible. Growth is unbounded;
/// for a long-running process this is a known resource tradeoff (there is
/// no eviction policy).
pub struct KnowledgeStore {
    normalizer: Normalizer,
    scorer: SimilarityScorer,
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeStore {
    /// A store seeded with the default question/answer set.
    pub fn new() -> Self {
        Self::with_entries(SEED_QA)
    }

    /// A store seeded with the given pairs (empty slice for a bare store).
    pub fn with_entries(pairs: &[(&str, &str)]) -> Self {
        let mut store = Self {
            normalizer: Normalizer::new(),
            scorer: SimilarityScorer::new(),
            entries: Vec::with_capacity(pairs.len()),
        };
        for (question, answer) in pairs {
            store.learn(question, answer);
        }
        tracing::debug!(
            target: "intelix::knowledge",
            entries = store.entries.len(),
            "knowledge store seeded"
        );
        store
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fuzzy retrieval: normalize the question, find the best stored key
    /// via the similarity scorer, return its answer.
    pub fn lookup(&self, question: &str) -> Option<&str> {
        let normalized = self.normalizer.normalize(question);
        let keys = self.entries.iter().map(|e| e.normalized_question.as_str());
        let best = self.scorer.best_match(&normalized, keys)?;
        let answer = self
            .entries
            .iter()
            .find(|e| e.normalized_question == best)
            .map(|e| e.answer.as_str());
        tracing::debug!(
            target: "intelix::knowledge",
            query = %normalized,
            matched = %best,
            "knowledge base hit"
        );
        answer
    }

    /// Stores `answer` under the normalized form of `question`; last write
    /// wins. Answers past [`MAX_ANSWER_CHARS`] are compacted to their
    /// first half; the compaction is lossy.
    ///
    /// The learn gate ([`super::should_store`]) is the caller's job; the
    /// store itself accepts everything.
    pub fn learn(&mut self, question: &str, answer: &str) {
        let key = self.normalizer.normalize(question);
        let stored = compact_answer(answer);
        let updated = match self
            .entries
            .iter_mut()
            .find(|e| e.normalized_question == key)
        {
            Some(entry) => {
                entry.answer = stored;
                true
            }
            None => {
                self.entries.push(KnowledgeEntry {
                    normalized_question: key.clone(),
                    answer: stored,
                });
                false
            }
        };
        tracing::info!(
            target: "intelix::knowledge",
            key = %key,
            action = if updated { "UPDATE" } else { "INSERT" },
            entries = self.entries.len(),
            "knowledge {}",
            if updated { "updated" } else { "learned" }
        );
    }
}

impl Default for KnowledgeStore {
    fn default() -> Self {
        Self::new()
    }
}

fn compact_answer(answer: &str) -> String {
    let count = answer.chars().count();
    if count > MAX_ANSWER_CHARS {
        answer.chars().take(count / 2).collect()
    } else {
        answer.to_string()
    }
}
