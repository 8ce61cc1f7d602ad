//! The session record and the cross-session leaderboard
//!
//! Both are plain data owned by the game store. Nothing here enforces the
//! transition rules; that is the job of the validator and the store.

use shared::{LeaderboardEntry, Score, SessionSnapshot, MAX_CHANCES};
use std::collections::HashMap;

/// Where the session is in its lifecycle, derived from the record's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Active,
    /// Out of chances; still addressable until `end`.
    Completed,
}

/// The single global session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub active: bool,
    pub participant_name: Option<String>,
    pub words_shown: u32,
    pub chances_remaining: u32,
    pub score_marked_for_current_word: bool,
    pub completed: bool,
    pub score: Score,
    pub current_word: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            active: false,
            participant_name: None,
            words_shown: 0,
            chances_remaining: MAX_CHANCES,
            score_marked_for_current_word: false,
            completed: false,
            score: Score::default(),
            current_word: None,
        }
    }
}

impl Session {
    /// A freshly started session for `participant` showing `word`.
    pub fn started(participant: String, word: String) -> Self {
        Self {
            active: true,
            participant_name: Some(participant),
            current_word: Some(word),
            ..Self::default()
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match (self.active, self.completed) {
            (false, _) => SessionPhase::Idle,
            (true, false) => SessionPhase::Active,
            (true, true) => SessionPhase::Completed,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            active: self.active,
            participant_name: self.participant_name.clone(),
            words_shown: self.words_shown,
            chances_remaining: self.chances_remaining,
            score_marked_for_current_word: self.score_marked_for_current_word,
            completed: self.completed,
            score: self.score,
            current_word: self.current_word.clone(),
        }
    }
}

/// Correct-mark totals per participant name, kept for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    scores: HashMap<String, u32>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an accepted mark. The entry is created on the first mark for a
    /// name even when that mark is wrong.
    pub fn record(&mut self, name: &str, correct: bool) -> u32 {
        let score = self.scores.entry(name.to_string()).or_insert(0);
        if correct {
            *score = score.saturating_add(1);
        }
        *score
    }

    pub fn score_of(&self, name: &str) -> Option<u32> {
        self.scores.get(name).copied()
    }

    /// Entries ordered by score, highest first; ties ordered by name.
    pub fn entries(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .scores
            .iter()
            .map(|(name, score)| LeaderboardEntry {
                name: name.clone(),
                score: *score,
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
        entries
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
