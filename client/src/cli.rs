use clap::{ArgGroup, Parser, Subcommand};
use shared::ClientMessage;

/// Word Wall admin and viewer tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Server WebSocket URL
    #[arg(
        short = 's',
        long,
        env = "WORDWALL_SERVER",
        default_value = "ws://127.0.0.1:3001"
    )]
    pub server: String,

    /// Presence name announced when watching
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// How long to wait for the server to answer, in milliseconds
    #[arg(short = 't', long, default_value = "2000")]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Join as a viewer and print every event
    Watch,
    /// Print the current session state
    Sync,
    /// Start a session for a participant
    Start { name: String },
    /// Advance to the next word
    Next,
    /// Replay the current word
    Repeat,
    /// Reveal the current word
    Reveal,
    /// End the session
    End,
    /// Record whether the participant guessed the current word
    #[command(group(ArgGroup::new("verdict").required(true).args(["correct", "wrong"])))]
    Mark {
        name: String,
        #[arg(long)]
        correct: bool,
        #[arg(long)]
        wrong: bool,
    },
}

impl Action {
    /// The message this action sends, or `None` for `watch`.
    pub fn to_message(&self) -> Option<ClientMessage> {
        let message = match self {
            Action::Watch => return None,
            Action::Sync => ClientMessage::SessionSync,
            Action::Start { name } => ClientMessage::start(Some(name.clone())),
            Action::Next => ClientMessage::AdminNext,
            Action::Repeat => ClientMessage::AdminRepeat,
            Action::Reveal => ClientMessage::AdminReveal,
            Action::End => ClientMessage::AdminEnd,
            Action::Mark { name, correct, .. } => ClientMessage::AdminMark {
                name: Some(name.clone()),
                correct: *correct,
            },
        };
        Some(message)
    }
}
