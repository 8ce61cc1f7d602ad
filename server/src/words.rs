//! Word selection
//!
//! The store asks a [`WordSource`] for each new word. Sources may fail; the
//! store then falls back to [`FallbackWords`], which is deterministic and
//! never fails, so a session can always advance.

use rand::seq::SliceRandom;
use std::collections::VecDeque;
use std::path::Path;
use thiserror::Error;

/// Shortest word the wall will display.
pub const MIN_WORD_LEN: usize = 3;

pub const BUILTIN_WORDS: &[&str] = &[
    "PORTAL", "LAB", "RADIO", "WALKIE", "ARCADE", "DEMOGORGON", "LIGHTS", "SIGNAL", "CIPHER",
    "TAPE", "VHS", "MODEM", "LASER", "ROBOT", "GALAXY", "NEON", "PIXEL", "SYNTH", "BINARY",
    "CASSETTE", "MONSTER", "UPSIDE", "HAWKINS", "BIKE", "FLASHLIGHT", "ANTENNA", "VOID",
    "STATIC", "CODE", "WAFFLE",
];

#[derive(Debug, Error)]
pub enum WordSourceError {
    #[error("word source is exhausted")]
    Exhausted,
    #[error("word source produced an unusable word: {0:?}")]
    InvalidWord(String),
    #[error("failed to read word list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("word list {0} contains no usable words")]
    EmptyList(String),
}

pub trait WordSource: Send {
    fn next_word(&mut self) -> Result<String, WordSourceError>;
}

/// Uppercases and strips everything but ASCII letters. Returns `None` when
/// fewer than [`MIN_WORD_LEN`] letters remain.
pub fn normalize_word(raw: &str) -> Option<String> {
    let word: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    (word.len() >= MIN_WORD_LEN).then_some(word)
}

/// Picks uniformly at random from a fixed list.
pub struct RandomWords {
    words: Vec<String>,
}

impl RandomWords {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_WORDS.iter().map(|w| w.to_string()).collect())
    }

    /// Loads one word per line. Blank lines and `#` comments are skipped and
    /// lines that do not normalize to a usable word are dropped.
    pub fn from_file(path: &Path) -> Result<Self, WordSourceError> {
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| WordSourceError::Io {
            path: display.clone(),
            source,
        })?;

        let words = parse_word_list(&contents);
        if words.is_empty() {
            return Err(WordSourceError::EmptyList(display));
        }
        Ok(Self::new(words))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordSource for RandomWords {
    fn next_word(&mut self) -> Result<String, WordSourceError> {
        self.words
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(WordSourceError::Exhausted)
    }
}

pub fn parse_word_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(normalize_word)
        .collect()
}

/// Yields a fixed sequence of words, then fails. Used to drive the store
/// deterministically.
pub struct ScriptedWords {
    words: VecDeque<String>,
}

impl ScriptedWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl WordSource for ScriptedWords {
    fn next_word(&mut self) -> Result<String, WordSourceError> {
        self.words.pop_front().ok_or(WordSourceError::Exhausted)
    }
}

/// Cycles through the built-in list in order.
#[derive(Debug, Default)]
pub struct FallbackWords {
    cursor: usize,
}

impl FallbackWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_word(&mut self) -> String {
        let word = BUILTIN_WORDS[self.cursor % BUILTIN_WORDS.len()];
        self.cursor = self.cursor.wrapping_add(1);
        word.to_string()
    }
}
