//! Rejection reasons for admin commands
//!
//! Every rejected command maps to exactly one of these. They are recovered at
//! the command boundary and reported to the issuing connection as an
//! `error{message}` event; the `Display` text is what the admin sees.

use thiserror::Error;

/// A required field was missing or empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("User name is required to start session")]
    MissingUserName,
    #[error("Name is required to mark a score")]
    MissingMarkName,
}

/// The command is well-formed but illegal in the current session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateConflict {
    #[error("A session for {participant} is already in progress")]
    SessionInProgress { participant: String },
    #[error("No active session")]
    NoActiveSession,
    #[error("Session is completed; end it to start a new one")]
    SessionCompleted,
    #[error("Cannot mark score for {name}: session belongs to {participant}")]
    ParticipantMismatch { name: String, participant: String },
    #[error("Score already marked for this word. Click Next Word to continue.")]
    AlreadyMarked,
    #[error("Please mark the score for current word before moving to next word")]
    ScoreNotMarked,
    #[error("No chances remaining in this session")]
    NoChancesRemaining,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    StateConflict(#[from] StateConflict),
}

impl CommandError {
    pub fn is_validation(&self) -> bool {
        matches!(self, CommandError::Validation(_))
    }

    pub fn is_state_conflict(&self) -> bool {
        matches!(self, CommandError::StateConflict(_))
    }
}
