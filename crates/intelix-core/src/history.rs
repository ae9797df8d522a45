//! Bounded, word-windowed conversational log.
//!
//! The buffer keeps role-tagged utterance lines until the total word count
//! crosses [`HISTORY_WORD_LIMIT`]; trimming then keeps only the trailing
//! window, re-chunked into [`HISTORY_CHUNK_WORDS`]-word lines. Chunked
//! lines lose their role tag; the windowing is lossy.

/// Total word ceiling across all stored lines.
pub const HISTORY_WORD_LIMIT: usize = 70;

/// Words per line after a trim re-chunks the window.
pub const HISTORY_CHUNK_WORDS: usize = 10;

/// Who said a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Bot => "Bot",
        }
    }
}

#[derive(Debug, Clone)]
struct HistoryLine {
    /// None for lines produced by trim re-chunking.
    speaker: Option<Speaker>,
    text: String,
}

/// Process-lifetime conversation log. Global to the engine instance; there
/// is no per-session isolation.
#[derive(Debug, Default)]
pub struct HistoryBuffer {
    lines: Vec<HistoryLine>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn append(&mut self, speaker: Speaker, text: &str) {
        self.lines.push(HistoryLine {
            speaker: Some(speaker),
            text: text.to_string(),
        });
    }

    /// All lines in order, one per line, role-tagged lines prefixed with
    /// their speaker label.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|line| match line.speaker {
                Some(speaker) => format!("{}: {}", speaker.label(), line.text),
                None => line.text.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Enforces the word ceiling: flattens all line texts into one word
    /// sequence and, past [`HISTORY_WORD_LIMIT`] words, keeps only the
    /// last window re-chunked into fixed-size untagged lines.
    pub fn trim(&mut self) {
        let words: Vec<&str> = self
            .lines
            .iter()
            .flat_map(|line| line.text.split_whitespace())
            .collect();
        if words.len() <= HISTORY_WORD_LIMIT {
            return;
        }
        let window = &words[words.len() - HISTORY_WORD_LIMIT..];
        self.lines = window
            .chunks(HISTORY_CHUNK_WORDS)
            .map(|chunk| HistoryLine {
                speaker: None,
                text: chunk.join(" "),
            })
            .collect();
        tracing::debug!(
            target: "intelix::history",
            lines = self.lines.len(),
            "history trimmed to trailing word window"
        );
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total words across all stored lines.
    pub fn word_count(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.text.split_whitespace().count())
            .sum()
    }
}
