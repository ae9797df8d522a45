//! Text normalization: informal-synonym expansion, lowercasing, word
//! tokenization, and memoized lemmatization.
//!
//! [`Normalizer::normalize`] produces the canonical form every stored
//! question passes through. It is idempotent, so knowledge-base keys
//! survive renormalization unchanged.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Capacity of the per-token lemma memo. Lemmatization runs on every token
/// of every comparison, so the memo keeps the hot vocabulary resident while
/// bounding memory.
pub const LEMMA_CACHE_CAPACITY: usize = 1000;

/// Informal token -> canonical replacement, matched whole-word and
/// case-insensitively before lowercasing.
const SYNONYMS: &[(&str, &str)] = &[
    ("idk", "I don't know"),
    ("idc", "I don't care"),
    ("u", "you"),
    ("ur", "your"),
    ("r", "are"),
    ("y", "why"),
    ("wht", "what"),
    ("wat", "what"),
    ("pls", "please"),
    ("plz", "please"),
    ("thx", "thanks"),
    ("ty", "thank you"),
    ("gonna", "going to"),
    ("wanna", "want to"),
    ("gotta", "got to"),
    ("im", "I am"),
    ("dont", "don't"),
    ("cant", "can't"),
    ("wont", "won't"),
];

/// Irregular word -> dictionary base form. Covers the forms the suffix
/// rules would get wrong: be/have/do verbs, strong past tenses, irregular
/// plurals, comparatives.
const IRREGULAR_LEMMAS: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("doing", "do"),
    ("goes", "go"),
    ("went", "go"),
    ("gone", "go"),
    ("going", "go"),
    ("says", "say"),
    ("said", "say"),
    ("made", "make"),
    ("making", "make"),
    ("got", "get"),
    ("gotten", "get"),
    ("took", "take"),
    ("taken", "take"),
    ("taking", "take"),
    ("came", "come"),
    ("coming", "come"),
    ("saw", "see"),
    ("seen", "see"),
    ("knew", "know"),
    ("known", "know"),
    ("thought", "think"),
    ("told", "tell"),
    ("gave", "give"),
    ("given", "give"),
    ("giving", "give"),
    ("found", "find"),
    ("felt", "feel"),
    ("left", "leave"),
    ("kept", "keep"),
    ("used", "use"),
    ("using", "use"),
    ("writing", "write"),
    ("wrote", "write"),
    ("written", "write"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("people", "person"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
];

/// Part-of-speech-agnostic lemmatizer: irregular-form table plus
/// conservative suffix rules, memoized in a bounded LRU cache.
///
/// Every output is a fixed point of the reduction, which is what makes the
/// normalizer idempotent.
pub struct Lemmatizer {
    cache: Mutex<LruCache<String, String>>,
}

impl Lemmatizer {
    pub fn new() -> Self {
        Self::with_capacity(LEMMA_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity is at least 1");
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Dictionary base form of a single lowercase token.
    pub fn lemma(&self, token: &str) -> String {
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.get(token) {
                return hit.clone();
            }
        }
        let computed = reduce(token);
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(token.to_string(), computed.clone());
        }
        computed
    }
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

fn reduce(token: &str) -> String {
    if let Some((_, base)) = IRREGULAR_LEMMAS.iter().find(|(form, _)| *form == token) {
        return (*base).to_string();
    }

    let n = token.len();
    if let Some(stem) = token.strip_suffix("ies") {
        if n > 4 {
            return format!("{stem}y");
        }
    }
    if token.ends_with("sses") {
        return token[..n - 2].to_string();
    }
    if n > 4
        && (token.ends_with("xes")
            || token.ends_with("zes")
            || token.ends_with("ches")
            || token.ends_with("shes"))
    {
        return token[..n - 2].to_string();
    }
    if n > 3
        && token.ends_with('s')
        && !token.ends_with("ss")
        && !token.ends_with("us")
        && !token.ends_with("is")
    {
        return token[..n - 1].to_string();
    }
    if n > 5 {
        if let Some(stem) = token.strip_suffix("ing") {
            return undouble(stem);
        }
    }
    if n > 4 {
        if let Some(stem) = token.strip_suffix("ed") {
            return undouble(stem);
        }
    }
    token.to_string()
}

/// Drops the doubled final consonant left behind by suffix stripping
/// ("running" -> "runn" -> "run"). Final l/s/z stay doubled.
fn undouble(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    if chars.len() >= 3 {
        let last = chars[chars.len() - 1];
        let prev = chars[chars.len() - 2];
        if last == prev && last.is_ascii_alphabetic() && !matches!(last, 'l' | 's' | 'z') {
            return chars[..chars.len() - 1].iter().collect();
        }
    }
    stem.to_string()
}

/// Canonicalizes text so two phrasings of the same question compare equal:
/// synonym expansion, lowercasing, word-character tokenization,
/// lemmatization, single-space join.
pub struct Normalizer {
    lemmatizer: Lemmatizer,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            lemmatizer: Lemmatizer::new(),
        }
    }

    /// Canonical form of `text`. Total; empty input yields empty output.
    pub fn normalize(&self, text: &str) -> String {
        let expanded = expand_synonyms(text);
        let mut tokens: Vec<String> = Vec::new();
        for raw in word_tokens(&expanded.to_lowercase()) {
            let lemma = self.lemmatizer.lemma(raw);
            // A lemma can collapse onto an informal form ("wats" -> "wat");
            // expand it once more so renormalization is stable.
            match synonym_expansion(&lemma) {
                Some(expansion) => {
                    for t in word_tokens(&expansion.to_lowercase()) {
                        tokens.push(self.lemmatizer.lemma(t));
                    }
                }
                None => tokens.push(lemma),
            }
        }
        tokens.join(" ")
    }
}

fn word_tokens(lowered: &str) -> impl Iterator<Item = &str> {
    lowered
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
}

fn synonym_expansion(word: &str) -> Option<&'static str> {
    SYNONYMS
        .iter()
        .find(|(from, _)| word.eq_ignore_ascii_case(from))
        .map(|(_, to)| *to)
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn expand_synonyms(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            // Match on the bare word so trailing punctuation does not
            // defeat the whole-word comparison.
            let bare = word.trim_matches(|c: char| !c.is_alphanumeric());
            match synonym_expansion(bare) {
                Some(to) => to.to_string(),
                None => word.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
