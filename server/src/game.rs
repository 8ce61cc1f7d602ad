//! Authoritative game store
//!
//! Owns the session record and the leaderboard. Every admin command goes
//! through [`GameStore::apply`], which validates it against the live session
//! and then mutates in one step. A rejected command leaves both the session
//! and the leaderboard untouched.

use crate::error::CommandError;
use crate::session::{Leaderboard, Session};
use crate::validator::{required_name, validate};
use crate::words::{normalize_word, FallbackWords, WordSource};
use log::{info, warn};
use shared::{LeaderboardEntry, SessionState, MAX_WORDS};

/// An admin command, decoded from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start { user_name: Option<String> },
    Mark { name: Option<String>, correct: bool },
    Next,
    Repeat,
    Reveal,
    End,
}

/// The outcome of an accepted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Started {
        user_name: String,
    },
    Marked {
        name: String,
        correct: bool,
        leaderboard: Vec<LeaderboardEntry>,
    },
    Advanced,
    /// The last chance was used up.
    Completed {
        user_name: String,
    },
    Repeated,
    Revealed {
        word: String,
    },
    Ended,
}

pub struct GameStore {
    session: Session,
    leaderboard: Leaderboard,
    words: Box<dyn WordSource>,
    fallback: FallbackWords,
}

impl GameStore {
    pub fn new(words: Box<dyn WordSource>) -> Self {
        Self {
            session: Session::default(),
            leaderboard: Leaderboard::new(),
            words,
            fallback: FallbackWords::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            session: self.session.snapshot(),
            leaderboard: self.leaderboard.entries(),
        }
    }

    pub fn apply(&mut self, command: Command) -> Result<Transition, CommandError> {
        validate(&self.session, &command)?;

        let transition = match command {
            Command::Start { user_name } => {
                let user_name = required_name(user_name.as_deref())
                    .unwrap_or_default()
                    .to_string();
                self.begin(user_name)
            }
            Command::Mark { name, correct } => self.record_mark(name.unwrap_or_default(), correct),
            Command::Next => self.advance(),
            Command::Repeat => Transition::Repeated,
            Command::Reveal => Transition::Revealed {
                word: self.session.current_word.clone().unwrap_or_default(),
            },
            Command::End => self.reset(),
        };
        Ok(transition)
    }

    pub fn start(&mut self, user_name: &str) -> Result<Transition, CommandError> {
        self.apply(Command::Start {
            user_name: Some(user_name.to_string()),
        })
    }

    pub fn mark(&mut self, name: &str, correct: bool) -> Result<Transition, CommandError> {
        self.apply(Command::Mark {
            name: Some(name.to_string()),
            correct,
        })
    }

    pub fn next(&mut self) -> Result<Transition, CommandError> {
        self.apply(Command::Next)
    }

    pub fn repeat(&mut self) -> Result<Transition, CommandError> {
        self.apply(Command::Repeat)
    }

    pub fn reveal(&mut self) -> Result<Transition, CommandError> {
        self.apply(Command::Reveal)
    }

    /// Always succeeds.
    pub fn end(&mut self) -> Transition {
        self.reset()
    }

    fn begin(&mut self, user_name: String) -> Transition {
        let word = self.select_word();
        self.session = Session::started(user_name.clone(), word);
        info!("Session started for {}", user_name);
        Transition::Started { user_name }
    }

    fn record_mark(&mut self, name: String, correct: bool) -> Transition {
        let total = self.leaderboard.record(&name, correct);
        if correct {
            self.session.score.correct += 1;
        } else {
            self.session.score.wrong += 1;
        }
        self.session.score_marked_for_current_word = true;
        info!(
            "Marked {} {} (total {})",
            name,
            if correct { "correct" } else { "wrong" },
            total
        );

        Transition::Marked {
            name,
            correct,
            leaderboard: self.leaderboard.entries(),
        }
    }

    fn advance(&mut self) -> Transition {
        let session = &mut self.session;
        session.chances_remaining = session.chances_remaining.saturating_sub(1);

        if session.chances_remaining == 0 || session.words_shown >= MAX_WORDS {
            session.completed = true;
            let user_name = session.participant_name.clone().unwrap_or_default();
            info!("Session for {} completed", user_name);
            return Transition::Completed { user_name };
        }

        session.words_shown += 1;
        session.score_marked_for_current_word = false;
        let word = self.select_word();
        self.session.current_word = Some(word);
        Transition::Advanced
    }

    fn reset(&mut self) -> Transition {
        if self.session.active {
            info!(
                "Session for {} ended",
                self.session.participant_name.as_deref().unwrap_or("?")
            );
        }
        self.session = Session::default();
        Transition::Ended
    }

    fn select_word(&mut self) -> String {
        match self.words.next_word() {
            Ok(raw) => match normalize_word(&raw) {
                Some(word) => return word,
                None => warn!("Word source produced unusable word {:?}, using fallback", raw),
            },
            Err(e) => warn!("Word source failed ({}), using fallback", e),
        }
        self.fallback.next_word()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StateConflict, ValidationError};
    use crate::words::{ScriptedWords, BUILTIN_WORDS};
    use shared::MAX_CHANCES;

    fn store() -> GameStore {
        GameStore::new(Box::new(ScriptedWords::new([
            "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india",
            "juliet", "kilo", "lima", "mike",
        ])))
    }

    #[test]
    fn test_start_resets_session() {
        let mut store = store();
        let transition = store.start("Alice").unwrap();

        assert_eq!(
            transition,
            Transition::Started {
                user_name: "Alice".to_string()
            }
        );
        let session = store.session();
        assert!(session.active);
        assert_eq!(session.participant_name.as_deref(), Some("Alice"));
        assert_eq!(session.chances_remaining, MAX_CHANCES);
        assert_eq!(session.words_shown, 0);
        assert!(!session.score_marked_for_current_word);
        assert!(!session.completed);
        assert_eq!(session.current_word.as_deref(), Some("ALPHA"));
    }

    #[test]
    fn test_start_trims_name() {
        let mut store = store();
        store.start("  Alice  ").unwrap();
        assert_eq!(store.session().participant_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_start_without_name_leaves_idle() {
        let mut store = store();
        let err = store.apply(Command::Start { user_name: None }).unwrap_err();
        assert_eq!(err, ValidationError::MissingUserName.into());
        assert_eq!(*store.session(), Session::default());
    }

    #[test]
    fn test_mark_sets_flag_and_scores() {
        let mut store = store();
        store.start("Alice").unwrap();

        let transition = store.mark("Alice", true).unwrap();
        match transition {
            Transition::Marked {
                name,
                correct,
                leaderboard,
            } => {
                assert_eq!(name, "Alice");
                assert!(correct);
                assert_eq!(leaderboard.len(), 1);
                assert_eq!(leaderboard[0].score, 1);
            }
            other => panic!("unexpected transition {:?}", other),
        }

        assert!(store.session().score_marked_for_current_word);
        assert_eq!(store.session().score.correct, 1);
        assert_eq!(store.session().score.wrong, 0);
    }

    #[test]
    fn test_double_mark_rejected_without_change() {
        let mut store = store();
        store.start("Alice").unwrap();
        store.mark("Alice", true).unwrap();

        let before = store.session().clone();
        let err = store.mark("Alice", true).unwrap_err();

        assert_eq!(err, StateConflict::AlreadyMarked.into());
        assert_eq!(*store.session(), before);
        assert_eq!(store.leaderboard().score_of("Alice"), Some(1));
    }

    #[test]
    fn test_mark_for_other_name_rejected() {
        let mut store = store();
        store.start("Alice").unwrap();

        let err = store.mark("Bob", true).unwrap_err();
        assert!(err.is_state_conflict());
        assert!(store.leaderboard().is_empty());
        assert!(!store.session().score_marked_for_current_word);
    }

    #[test]
    fn test_next_without_mark_is_idempotent_rejection() {
        let mut store = store();
        store.start("Alice").unwrap();
        let before = store.session().clone();

        for _ in 0..3 {
            assert_eq!(
                store.next().unwrap_err(),
                StateConflict::ScoreNotMarked.into()
            );
            assert_eq!(*store.session(), before);
        }
    }

    #[test]
    fn test_next_advances_and_resets_flag() {
        let mut store = store();
        store.start("Alice").unwrap();
        store.mark("Alice", false).unwrap();

        assert_eq!(store.next().unwrap(), Transition::Advanced);

        let session = store.session();
        assert_eq!(session.chances_remaining, MAX_CHANCES - 1);
        assert_eq!(session.words_shown, 1);
        assert!(!session.score_marked_for_current_word);
        assert_eq!(session.current_word.as_deref(), Some("BRAVO"));
        assert_eq!(session.score.wrong, 1);
    }

    #[test]
    fn test_full_session_completes_on_twelfth_next() {
        let mut store = store();
        store.start("Alice").unwrap();

        let mut previous = store.session().chances_remaining;
        for round in 1..=MAX_CHANCES {
            store.mark("Alice", round % 2 == 1).unwrap();
            let transition = store.next().unwrap();

            let chances = store.session().chances_remaining;
            assert!(chances < previous);
            previous = chances;

            if round < MAX_CHANCES {
                assert_eq!(transition, Transition::Advanced);
                assert!(!store.session().completed);
            } else {
                assert_eq!(
                    transition,
                    Transition::Completed {
                        user_name: "Alice".to_string()
                    }
                );
            }
        }

        let session = store.session();
        assert_eq!(session.chances_remaining, 0);
        assert!(session.completed);
        assert!(session.active);
        assert_eq!(session.score.correct, 6);
        assert_eq!(session.score.wrong, 6);
        assert_eq!(store.leaderboard().score_of("Alice"), Some(6));
    }

    #[test]
    fn test_word_cap_completes_session_with_chances_left() {
        let mut store = store();
        store.start("Alice").unwrap();
        store.mark("Alice", true).unwrap();
        store.session.words_shown = MAX_WORDS;

        assert_eq!(
            store.next().unwrap(),
            Transition::Completed {
                user_name: "Alice".to_string()
            }
        );
        let session = store.session();
        assert!(session.completed);
        assert_eq!(session.chances_remaining, MAX_CHANCES - 1);
        assert_eq!(session.words_shown, MAX_WORDS);
    }

    #[test]
    fn test_completed_session_rejects_play_commands() {
        let mut store = store();
        store.start("Alice").unwrap();
        for _ in 0..MAX_CHANCES {
            store.mark("Alice", true).unwrap();
            store.next().unwrap();
        }
        let before = store.session().clone();

        assert_eq!(store.next().unwrap_err(), StateConflict::NoChancesRemaining.into());
        assert_eq!(store.repeat().unwrap_err(), StateConflict::SessionCompleted.into());
        assert_eq!(store.reveal().unwrap_err(), StateConflict::SessionCompleted.into());
        assert_eq!(store.mark("Alice", true).unwrap_err(), StateConflict::AlreadyMarked.into());
        assert_eq!(*store.session(), before);
    }

    #[test]
    fn test_start_after_completion() {
        let mut store = store();
        store.start("Alice").unwrap();
        for _ in 0..MAX_CHANCES {
            store.mark("Alice", true).unwrap();
            store.next().unwrap();
        }

        store.start("Bob").unwrap();
        let session = store.session();
        assert_eq!(session.participant_name.as_deref(), Some("Bob"));
        assert_eq!(session.chances_remaining, MAX_CHANCES);
        assert!(!session.completed);
        assert_eq!(session.score, shared::Score::default());
        assert_eq!(store.leaderboard().score_of("Alice"), Some(12));
    }

    #[test]
    fn test_start_over_active_session_rejected() {
        let mut store = store();
        store.start("Alice").unwrap();
        let err = store.start("Bob").unwrap_err();
        assert!(err.is_state_conflict());
        assert_eq!(store.session().participant_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_reveal_carries_current_word() {
        let mut store = store();
        store.start("Alice").unwrap();
        assert_eq!(
            store.reveal().unwrap(),
            Transition::Revealed {
                word: "ALPHA".to_string()
            }
        );
        assert_eq!(store.repeat().unwrap(), Transition::Repeated);
        assert!(!store.session().score_marked_for_current_word);
    }

    #[test]
    fn test_end_from_any_state() {
        let mut store = store();
        assert_eq!(store.end(), Transition::Ended);
        assert_eq!(*store.session(), Session::default());

        store.start("Alice").unwrap();
        store.mark("Alice", true).unwrap();
        assert_eq!(store.apply(Command::End).unwrap(), Transition::Ended);
        assert_eq!(*store.session(), Session::default());
        assert_eq!(store.leaderboard().score_of("Alice"), Some(1));
    }

    #[test]
    fn test_leaderboard_accumulates_across_sessions() {
        let mut store = store();
        for _ in 0..3 {
            store.start("Alice").unwrap();
            store.mark("Alice", true).unwrap();
            store.end();
        }
        store.start("Alice").unwrap();
        store.mark("Alice", false).unwrap();

        assert_eq!(store.leaderboard().score_of("Alice"), Some(3));
    }

    #[test]
    fn test_failing_source_falls_back() {
        let mut store = GameStore::new(Box::new(ScriptedWords::new(["ok", "fine"])));
        store.start("Alice").unwrap();

        // "ok" is too short to display
        assert_eq!(
            store.session().current_word.as_deref(),
            Some(BUILTIN_WORDS[0])
        );

        store.mark("Alice", true).unwrap();
        store.next().unwrap();
        assert_eq!(store.session().current_word.as_deref(), Some("FINE"));

        store.mark("Alice", true).unwrap();
        store.next().unwrap();
        assert_eq!(
            store.session().current_word.as_deref(),
            Some(BUILTIN_WORDS[1])
        );
    }

    #[test]
    fn test_state_snapshot() {
        let mut store = store();
        store.start("Alice").unwrap();
        store.mark("Alice", true).unwrap();

        let state = store.state();
        assert!(state.session.score_marked_for_current_word);
        assert_eq!(state.session.participant_name.as_deref(), Some("Alice"));
        assert_eq!(state.leaderboard.len(), 1);
    }
}
