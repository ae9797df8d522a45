//! Emotion classification and canned emotional responses.
//!
//! Classification maps a sentiment-polarity score to one of four
//! categories; the responder picks a canned line per category. Neither
//! feeds back into retrieval or learning; the attachment is purely
//! presentational.

mod lexicon;

pub use lexicon::LexiconAnalyzer;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Sentiment-polarity collaborator: compound score in [-1, 1].
pub trait SentimentAnalyzer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

/// Categorical emotion of an utterance. Computed per request, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionCategory {
    Happy,
    Sad,
    Angry,
    Neutral,
}

impl EmotionCategory {
    pub fn label(&self) -> &'static str {
        match self {
            EmotionCategory::Happy => "happy",
            EmotionCategory::Sad => "sad",
            EmotionCategory::Angry => "angry",
            EmotionCategory::Neutral => "neutral",
        }
    }
}

/// Threshold classifier over a [`SentimentAnalyzer`] score.
pub struct EmotionClassifier {
    analyzer: Arc<dyn SentimentAnalyzer>,
}

impl EmotionClassifier {
    pub fn new() -> Self {
        Self::with_analyzer(Arc::new(LexiconAnalyzer::new()))
    }

    pub fn with_analyzer(analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        Self { analyzer }
    }

    pub fn classify(&self, text: &str) -> EmotionCategory {
        let score = self.analyzer.polarity(text);
        let category = if score >= 0.25 {
            EmotionCategory::Happy
        } else if score <= -0.5 {
            EmotionCategory::Angry
        } else if score <= -0.25 {
            EmotionCategory::Sad
        } else {
            EmotionCategory::Neutral
        };
        tracing::debug!(
            target: "intelix::emotion",
            score,
            category = category.label(),
            "utterance classified"
        );
        category
    }
}

impl Default for EmotionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

const HAPPY_RESPONSES: &[&str] = &[
    "That's wonderful to hear!",
    "I'm glad things are going well for you.",
    "Great! Your good mood is contagious.",
    "Love the positivity, keep it up!",
];

const SAD_RESPONSES: &[&str] = &[
    "I'm sorry you're feeling down.",
    "That sounds tough. I'm here if you want to talk.",
    "I hope things look brighter for you soon.",
];

const ANGRY_RESPONSES: &[&str] = &[
    "I can tell you're upset. Let's take it one step at a time.",
    "I'm sorry something made you angry. How can I help?",
    "That sounds really frustrating.",
];

const NEUTRAL_RESPONSES: &[&str] = &[
    "Got it.",
    "Alright, noted.",
    "Okay. What else would you like to know?",
];

/// Picks a canned line for a category, uniformly at random.
///
/// The RNG is seedable so tests can pin the sequence; production use takes
/// an entropy seed. Without a seed the choice is nondeterministic, so
/// tests assert pool membership rather than exact strings.
pub struct CannedResponder {
    rng: Mutex<StdRng>,
}

impl CannedResponder {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// The fixed response pool for a category.
    pub fn pool(category: EmotionCategory) -> &'static [&'static str] {
        match category {
            EmotionCategory::Happy => HAPPY_RESPONSES,
            EmotionCategory::Sad => SAD_RESPONSES,
            EmotionCategory::Angry => ANGRY_RESPONSES,
            EmotionCategory::Neutral => NEUTRAL_RESPONSES,
        }
    }

    pub fn respond(&self, category: EmotionCategory) -> String {
        let pool = Self::pool(category);
        let index = self
            .rng
            .lock()
            .map(|mut rng| rng.gen_range(0..pool.len()))
            .unwrap_or(0);
        pool[index].to_string()
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::new()
    }
}
