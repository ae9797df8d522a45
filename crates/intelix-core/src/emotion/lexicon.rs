//! Embedded-lexicon sentiment analyzer.
//!
//! Sums word valences with negation flips and intensity boosters, then
//! squashes the raw sum to a compound score in [-1, 1] with
//! `x / sqrt(x^2 + 15)`. One valenced word lands near the Happy/Sad
//! boundaries (+/-0.25); three land past the Angry threshold.

use super::SentimentAnalyzer;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "happy", "love", "loved", "like", "liked", "excellent", "wonderful",
    "amazing", "awesome", "nice", "glad", "fantastic", "perfect", "joy", "delighted", "pleased",
    "fun", "cool", "thanks", "thank", "helpful", "beautiful", "brilliant", "enjoy", "enjoyed",
    "excited", "fabulous", "win", "won", "yay", "superb", "smile",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "sad", "angry", "hate", "hated", "terrible", "awful", "horrible", "furious", "upset",
    "annoyed", "annoying", "disappointed", "disappointing", "miserable", "cry", "crying",
    "unhappy", "depressed", "stupid", "useless", "broken", "wrong", "fail", "failed", "failure",
    "lost", "lose", "mad", "rage", "disgusting", "pathetic", "ugly", "hurt",
];

/// Tokens that flip the valence of the word right after them. "t" covers
/// contraction tails after tokenization ("don't" -> "don", "t").
const NEGATORS: &[&str] = &["not", "no", "never", "neither", "nor", "t"];

/// Tokens that amplify the word right after them.
const BOOSTERS: &[&str] = &["very", "really", "so", "extremely", "totally", "absolutely"];

const BOOST_FACTOR: f64 = 1.5;

/// Normalization constant for the compound squash, per the classic
/// valence-aggregation formula.
const COMPOUND_ALPHA: f64 = 15.0;

#[derive(Debug, Default)]
pub struct LexiconAnalyzer;

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentAnalyzer for LexiconAnalyzer {
    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        let mut sum = 0.0;
        for (i, token) in tokens.iter().enumerate() {
            let mut valence = if POSITIVE_WORDS.contains(token) {
                1.0
            } else if NEGATIVE_WORDS.contains(token) {
                -1.0
            } else {
                continue;
            };
            if i > 0 {
                let prev = tokens[i - 1];
                if NEGATORS.contains(&prev) {
                    valence = -valence;
                } else if BOOSTERS.contains(&prev) {
                    valence *= BOOST_FACTOR;
                }
            }
            sum += valence;
        }

        if sum == 0.0 {
            return 0.0;
        }
        (sum / (sum * sum + COMPOUND_ALPHA).sqrt()).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_text_scores_zero() {
        let analyzer = LexiconAnalyzer::new();
        assert_eq!(analyzer.polarity("the sky has clouds"), 0.0);
        assert_eq!(analyzer.polarity(""), 0.0);
    }

    #[test]
    fn single_valenced_word_reaches_the_first_threshold() {
        let analyzer = LexiconAnalyzer::new();
        // 1 / sqrt(16) = 0.25 exactly.
        assert!(analyzer.polarity("good") >= 0.25);
        assert!(analyzer.polarity("sad") <= -0.25);
    }

    #[test]
    fn piled_up_negativity_crosses_the_angry_threshold() {
        let analyzer = LexiconAnalyzer::new();
        let score = analyzer.polarity("I hate this awful terrible mess");
        assert!(score <= -0.5, "got {score}");
    }

    #[test]
    fn negation_flips_valence() {
        let analyzer = LexiconAnalyzer::new();
        assert!(analyzer.polarity("not good") < 0.0);
        assert!(analyzer.polarity("not bad") > 0.0);
    }

    #[test]
    fn contraction_tails_negate() {
        // "don't like" tokenizes to don / t / like; "t" flips "like".
        let analyzer = LexiconAnalyzer::new();
        assert!(analyzer.polarity("I don't like this") < 0.0);
    }

    #[test]
    fn boosters_amplify() {
        let analyzer = LexiconAnalyzer::new();
        assert!(analyzer.polarity("very good") > analyzer.polarity("good"));
    }

    #[test]
    fn scores_stay_in_range() {
        let analyzer = LexiconAnalyzer::new();
        let gushing = "love love love great great amazing wonderful perfect fantastic";
        let score = analyzer.polarity(gushing);
        assert!(score > 0.5 && score <= 1.0);
    }
}
