//! Plain-text rendering of server events for the terminal

use shared::{LeaderboardEntry, PlayerInfo, ServerMessage, SessionSnapshot, SessionState, MAX_WORDS};

pub fn describe(message: &ServerMessage) -> String {
    match message {
        ServerMessage::Start { user_name } => format!("▶ session started for {}", user_name),
        ServerMessage::Next => "→ next word".to_string(),
        ServerMessage::Repeat => "↺ repeat current word".to_string(),
        ServerMessage::Reveal { word } => format!("★ the word was {}", word),
        ServerMessage::End => "■ session ended".to_string(),
        ServerMessage::Score { name, correct } => format!(
            "{} {} marked {}",
            if *correct { "✔" } else { "✘" },
            name,
            if *correct { "correct" } else { "wrong" }
        ),
        ServerMessage::Leaderboard(entries) => format!("leaderboard\n{}", leaderboard(entries)),
        ServerMessage::PlayersList(players) => format!("players: {}", roster(players)),
        ServerMessage::SessionCompleted { user_name } => {
            format!("✓ session for {} completed", user_name)
        }
        ServerMessage::SessionState(state) => describe_state(state),
        ServerMessage::Error { message } => format!("error: {}", message),
    }
}

pub fn describe_state(state: &SessionState) -> String {
    let mut out = session_line(&state.session);
    if !state.leaderboard.is_empty() {
        out.push('\n');
        out.push_str(&leaderboard(&state.leaderboard));
    }
    out
}

fn session_line(session: &SessionSnapshot) -> String {
    let Some(name) = session.participant_name.as_deref().filter(|_| session.active) else {
        return "no active session".to_string();
    };

    let status = if session.completed {
        "completed"
    } else if session.score_marked_for_current_word {
        "marked"
    } else {
        "awaiting mark"
    };

    format!(
        "session: {} | words {}/{} | chances left {} | {} correct, {} wrong | {}",
        name,
        session.words_shown,
        MAX_WORDS,
        session.chances_remaining,
        session.score.correct,
        session.score.wrong,
        status
    )
}

fn leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "  (empty)".to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("  {:>2}. {:<20} {}", i + 1, entry.name, entry.score))
        .collect::<Vec<_>>()
        .join("\n")
}

fn roster(players: &[PlayerInfo]) -> String {
    if players.is_empty() {
        return "(none)".to_string();
    }
    players
        .iter()
        .map(|p| p.name.clone().unwrap_or_else(|| format!("<{}>", p.id)))
        .collect::<Vec<_>>()
        .join(", ")
}
