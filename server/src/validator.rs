//! Legality checks for admin commands
//!
//! `validate` is evaluated against the store's live session inside the
//! serialized command path, so its answer can never be stale. Validation
//! errors are reported before state conflicts.

use crate::error::{CommandError, StateConflict, ValidationError};
use crate::game::Command;
use crate::session::{Session, SessionPhase};

pub fn validate(session: &Session, command: &Command) -> Result<(), CommandError> {
    match command {
        Command::Start { user_name } => validate_start(session, user_name.as_deref()),
        Command::Mark { name, .. } => validate_mark(session, name.as_deref()),
        Command::Next => validate_next(session),
        Command::Repeat | Command::Reveal => require_active(session),
        Command::End => Ok(()),
    }
}

/// Returns the trimmed name, or `None` when it is missing or blank.
pub fn required_name(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|n| !n.is_empty())
}

fn validate_start(session: &Session, user_name: Option<&str>) -> Result<(), CommandError> {
    if required_name(user_name).is_none() {
        return Err(ValidationError::MissingUserName.into());
    }

    match session.phase() {
        SessionPhase::Idle | SessionPhase::Completed => Ok(()),
        SessionPhase::Active => Err(StateConflict::SessionInProgress {
            participant: session.participant_name.clone().unwrap_or_default(),
        }
        .into()),
    }
}

fn validate_mark(session: &Session, name: Option<&str>) -> Result<(), CommandError> {
    let Some(name) = name.filter(|n| required_name(Some(n)).is_some()) else {
        return Err(ValidationError::MissingMarkName.into());
    };

    let participant = match (&session.participant_name, session.active) {
        (Some(participant), true) => participant,
        _ => return Err(StateConflict::NoActiveSession.into()),
    };

    if name != participant {
        return Err(StateConflict::ParticipantMismatch {
            name: name.to_string(),
            participant: participant.clone(),
        }
        .into());
    }

    if session.score_marked_for_current_word {
        return Err(StateConflict::AlreadyMarked.into());
    }

    Ok(())
}

fn validate_next(session: &Session) -> Result<(), CommandError> {
    if !session.active {
        return Err(StateConflict::NoActiveSession.into());
    }
    if session.chances_remaining == 0 {
        return Err(StateConflict::NoChancesRemaining.into());
    }
    if !session.score_marked_for_current_word {
        return Err(StateConflict::ScoreNotMarked.into());
    }
    Ok(())
}

fn require_active(session: &Session) -> Result<(), CommandError> {
    match session.phase() {
        SessionPhase::Active => Ok(()),
        SessionPhase::Idle => Err(StateConflict::NoActiveSession.into()),
        SessionPhase::Completed => Err(StateConflict::SessionCompleted.into()),
    }
}
