use serde::{Deserialize, Serialize};

/// Chances a participant starts every session with.
pub const MAX_CHANCES: u32 = 12;
/// Upper bound on words presented in one session.
pub const MAX_WORDS: u32 = 12;

pub type ConnectionId = String;

/// Messages a client sends to the server.
///
/// On the wire every message is a JSON object `{"event": ..., "data": ...}`;
/// `data` is absent for commands that carry no payload. For `admin:start` and
/// `player:join` a missing or `null` payload decodes as `None`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum ClientMessage {
    #[serde(rename = "admin:start")]
    AdminStart(Option<StartPayload>),
    #[serde(rename = "admin:next")]
    AdminNext,
    #[serde(rename = "admin:repeat")]
    AdminRepeat,
    #[serde(rename = "admin:reveal")]
    AdminReveal,
    #[serde(rename = "admin:end")]
    AdminEnd,
    #[serde(rename = "admin:mark")]
    AdminMark {
        #[serde(default)]
        name: Option<String>,
        correct: bool,
    },
    #[serde(rename = "player:join")]
    PlayerJoin(Option<JoinPayload>),
    #[serde(rename = "session:sync")]
    SessionSync,
}

impl ClientMessage {
    pub fn start(user_name: Option<String>) -> Self {
        ClientMessage::AdminStart(Some(StartPayload { user_name }))
    }

    pub fn join(name: Option<String>) -> Self {
        ClientMessage::PlayerJoin(Some(JoinPayload { name }))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StartPayload {
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct JoinPayload {
    #[serde(default)]
    pub name: Option<String>,
}

/// Events the server sends to clients.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum ServerMessage {
    #[serde(rename = "start")]
    Start {
        #[serde(rename = "userName")]
        user_name: String,
    },
    #[serde(rename = "next")]
    Next,
    #[serde(rename = "repeat")]
    Repeat,
    #[serde(rename = "reveal")]
    Reveal { word: String },
    #[serde(rename = "end")]
    End,
    #[serde(rename = "score")]
    Score { name: String, correct: bool },
    #[serde(rename = "leaderboard")]
    Leaderboard(Vec<LeaderboardEntry>),
    #[serde(rename = "players:list")]
    PlayersList(Vec<PlayerInfo>),
    #[serde(rename = "admin:sessionCompleted")]
    SessionCompleted {
        #[serde(rename = "userName")]
        user_name: String,
    },
    #[serde(rename = "session:state")]
    SessionState(SessionState),
    #[serde(rename = "error")]
    Error { message: String },
}

impl ServerMessage {
    /// Wire name of the event, as it appears in the `event` field.
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::Start { .. } => "start",
            ServerMessage::Next => "next",
            ServerMessage::Repeat => "repeat",
            ServerMessage::Reveal { .. } => "reveal",
            ServerMessage::End => "end",
            ServerMessage::Score { .. } => "score",
            ServerMessage::Leaderboard(_) => "leaderboard",
            ServerMessage::PlayersList(_) => "players:list",
            ServerMessage::SessionCompleted { .. } => "admin:sessionCompleted",
            ServerMessage::SessionState(_) => "session:state",
            ServerMessage::Error { .. } => "error",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub id: ConnectionId,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub correct: u32,
    pub wrong: u32,
}

/// Point-in-time copy of the session record.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub active: bool,
    pub participant_name: Option<String>,
    pub words_shown: u32,
    pub chances_remaining: u32,
    pub score_marked_for_current_word: bool,
    pub completed: bool,
    pub score: Score,
    pub current_word: Option<String>,
}

/// Payload of `session:state`, sent on connect and on `session:sync`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub session: SessionSnapshot,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_admin_start() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"event":"admin:start","data":{"userName":"Alice"}}"#)
                .unwrap();
        assert_eq!(msg, ClientMessage::start(Some("Alice".to_string())));
    }

    #[test]
    fn test_parse_admin_start_without_name() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"event":"admin:start","data":{}}"#).unwrap();
        assert_eq!(msg, ClientMessage::start(None));
    }

    #[test]
    fn test_parse_payload_optional_commands_without_data() {
        let cases = [
            (r#"{"event":"admin:start"}"#, ClientMessage::AdminStart(None)),
            (r#"{"event":"admin:start","data":null}"#, ClientMessage::AdminStart(None)),
            (r#"{"event":"player:join"}"#, ClientMessage::PlayerJoin(None)),
            (r#"{"event":"player:join","data":null}"#, ClientMessage::PlayerJoin(None)),
        ];

        for (raw, expected) in cases {
            let parsed: ClientMessage = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, expected, "message {}", raw);
        }
    }

    #[test]
    fn test_parse_player_join() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"event":"player:join","data":{"name":"Wall"}}"#).unwrap();
        assert_eq!(msg, ClientMessage::join(Some("Wall".to_string())));
    }

    #[test]
    fn test_parse_commands_without_payload() {
        let cases = [
            ("admin:next", ClientMessage::AdminNext),
            ("admin:repeat", ClientMessage::AdminRepeat),
            ("admin:reveal", ClientMessage::AdminReveal),
            ("admin:end", ClientMessage::AdminEnd),
            ("session:sync", ClientMessage::SessionSync),
        ];

        for (event, expected) in cases {
            let raw = format!(r#"{{"event":"{}"}}"#, event);
            let parsed: ClientMessage = serde_json::from_str(&raw).unwrap();
            assert_eq!(parsed, expected, "event {}", event);
        }
    }

    #[test]
    fn test_parse_admin_mark() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"event":"admin:mark","data":{"name":"Alice","correct":true}}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::AdminMark {
                name: Some("Alice".to_string()),
                correct: true
            }
        );
    }

    #[test]
    fn test_parse_unknown_event_fails() {
        let result = serde_json::from_str::<ClientMessage>(r#"{"event":"admin:explode"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unit_event_has_no_data() {
        let value = serde_json::to_value(ServerMessage::Next).unwrap();
        assert_eq!(value, json!({"event": "next"}));
    }

    #[test]
    fn test_start_event_shape() {
        let value = serde_json::to_value(ServerMessage::Start {
            user_name: "Alice".to_string(),
        })
        .unwrap();
        assert_eq!(value, json!({"event": "start", "data": {"userName": "Alice"}}));
    }

    #[test]
    fn test_leaderboard_event_carries_array() {
        let value = serde_json::to_value(ServerMessage::Leaderboard(vec![LeaderboardEntry {
            name: "Alice".to_string(),
            score: 3,
        }]))
        .unwrap();
        assert_eq!(
            value,
            json!({"event": "leaderboard", "data": [{"name": "Alice", "score": 3}]})
        );
    }

    #[test]
    fn test_players_list_keeps_null_names() {
        let value = serde_json::to_value(ServerMessage::PlayersList(vec![PlayerInfo {
            id: "abc".to_string(),
            name: None,
        }]))
        .unwrap();
        assert_eq!(
            value,
            json!({"event": "players:list", "data": [{"id": "abc", "name": null}]})
        );
    }

    #[test]
    fn test_snapshot_uses_camel_case() {
        let snapshot = SessionSnapshot {
            active: true,
            participant_name: Some("Alice".to_string()),
            words_shown: 2,
            chances_remaining: 10,
            score_marked_for_current_word: false,
            completed: false,
            score: Score {
                correct: 1,
                wrong: 1,
            },
            current_word: Some("PORTAL".to_string()),
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["participantName"], "Alice");
        assert_eq!(value["chancesRemaining"], 10);
        assert_eq!(value["scoreMarkedForCurrentWord"], false);
        assert_eq!(value["currentWord"], "PORTAL");
    }

    #[test]
    fn test_event_name_matches_wire_tag() {
        let messages = vec![
            ServerMessage::Repeat,
            ServerMessage::SessionCompleted {
                user_name: "Alice".to_string(),
            },
            ServerMessage::Error {
                message: "nope".to_string(),
            },
        ];

        for message in messages {
            let value = serde_json::to_value(&message).unwrap();
            assert_eq!(value["event"], message.event_name());
        }
    }
}
