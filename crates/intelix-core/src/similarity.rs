//! Fuzzy similarity scoring between questions.
//!
//! The combined score averages three signals: stem-set overlap (jaccard),
//! a token-order-insensitive edit-distance ratio, and the mean pairwise
//! character ratio across the two stem sets. Stemming here is the light
//! Snowball suffix-stripper, a cruder reduction than the normalizer's
//! dictionary lemmatizer.
//!
//! Cost per call is O(Q × C × |Sq| × |Sc|), dominated by the pairwise
//! term. Acceptable only because the knowledge base stays small; this is a
//! known scaling limit.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

/// A candidate is accepted only when its combined score is strictly above
/// this threshold.
pub const MATCH_THRESHOLD: f64 = 0.5;

pub struct SimilarityScorer {
    stemmer: Stemmer,
}

impl SimilarityScorer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    fn stem_set(&self, text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| !w.is_empty())
            .map(|w| self.stemmer.stem(w).to_string())
            .collect()
    }

    /// Combined similarity in [0, 1].
    pub fn score(&self, query: &str, candidate: &str) -> f64 {
        let sq = self.stem_set(query);
        let sc = self.stem_set(candidate);
        let jaccard = jaccard(&sq, &sc);
        let fuzzy = token_set_ratio(query, candidate);
        let pairwise = mean_pairwise_ratio(&sq, &sc);
        (jaccard + fuzzy + pairwise) / 3.0
    }

    /// Best candidate scoring strictly above [`MATCH_THRESHOLD`], or None.
    ///
    /// The first candidate reaching the maximum wins, so iteration order
    /// decides ties; callers iterate the knowledge base in insertion order
    /// for reproducible results.
    pub fn best_match<'a, I>(&self, query: &str, candidates: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut best: Option<(&'a str, f64)> = None;
        for candidate in candidates {
            let score = self.score(query, candidate);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((candidate, score)),
            }
        }
        best.filter(|(_, score)| *score > MATCH_THRESHOLD)
            .map(|(candidate, _)| candidate)
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new()
    }
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Token-order-insensitive fuzzy ratio: dedupe and sort the tokens of each
/// side, then take the edit-distance ratio of the joined forms.
fn token_set_ratio(a: &str, b: &str) -> f64 {
    let canonical = |s: &str| {
        let lowered = s.to_lowercase();
        let mut tokens: Vec<&str> = lowered
            .split_whitespace()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        tokens.sort_unstable();
        tokens.join(" ")
    };
    let (ca, cb) = (canonical(a), canonical(b));
    if ca.is_empty() && cb.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(&ca, &cb)
}

/// Mean character-level ratio over the cross product of the two stem sets;
/// 0 when either set is empty.
fn mean_pairwise_ratio(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let mut total = 0.0;
    let mut pairs = 0usize;
    for wa in a {
        for wb in b {
            total += strsim::normalized_levenshtein(wa, wb);
            pairs += 1;
        }
    }
    total / pairs as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_question_is_its_own_best_match() {
        let scorer = SimilarityScorer::new();
        for q in ["hello", "who own you", "what be the capital of india"] {
            assert_eq!(scorer.best_match(q, [q]), Some(q));
        }
    }

    #[test]
    fn identical_single_token_scores_one() {
        let scorer = SimilarityScorer::new();
        let score = scorer.score("hello", "hello");
        assert!((score - 1.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn unrelated_candidates_score_below_threshold() {
        let scorer = SimilarityScorer::new();
        let candidates = ["who own you", "what be your name", "how be you"];
        assert_eq!(scorer.best_match("zzz1 zzz2", candidates), None);
    }

    #[test]
    fn no_candidates_yields_none() {
        let scorer = SimilarityScorer::new();
        assert_eq!(scorer.best_match("hello", []), None);
    }

    #[test]
    fn first_of_tied_candidates_wins() {
        let scorer = SimilarityScorer::new();
        // Duplicate candidates tie exactly; the earliest must be returned.
        let first = String::from("who own you");
        let second = String::from("who own you");
        let found = scorer
            .best_match("who own you", [first.as_str(), second.as_str()])
            .unwrap();
        assert!(std::ptr::eq(found, first.as_str()));
    }

    #[test]
    fn word_order_changes_are_tolerated() {
        let scorer = SimilarityScorer::new();
        let score = scorer.score("you own who", "who own you");
        assert!(score > MATCH_THRESHOLD, "got {score}");
    }

    #[test]
    fn jaccard_of_two_empty_sets_is_zero() {
        assert_eq!(jaccard(&HashSet::new(), &HashSet::new()), 0.0);
    }

    #[test]
    fn pairwise_ratio_is_zero_when_a_side_is_empty() {
        let scorer = SimilarityScorer::new();
        let empty = HashSet::new();
        let full = scorer.stem_set("hello world");
        assert_eq!(mean_pairwise_ratio(&empty, &full), 0.0);
    }
}
