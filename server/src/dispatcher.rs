//! Broadcast dispatcher
//!
//! Turns accepted transitions into wire events and fans them out to every
//! connection's outbound queue. Sends never wait: a full or closed queue
//! drops the event for that connection only.

use crate::client_manager::ClientManager;
use crate::game::Transition;
use log::{debug, error, warn};
use shared::ServerMessage;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;
use tokio_tungstenite::tungstenite::Message;

/// Per-broadcast delivery counts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub dropped: usize,
}

/// Events announced to all clients for a transition, in send order.
pub fn events_for(transition: Transition) -> Vec<ServerMessage> {
    match transition {
        Transition::Started { user_name } => vec![ServerMessage::Start { user_name }],
        Transition::Marked {
            name,
            correct,
            leaderboard,
        } => vec![
            ServerMessage::Leaderboard(leaderboard),
            ServerMessage::Score { name, correct },
        ],
        Transition::Advanced => vec![ServerMessage::Next],
        Transition::Completed { user_name } => vec![
            ServerMessage::Next,
            ServerMessage::SessionCompleted { user_name },
        ],
        Transition::Repeated => vec![ServerMessage::Repeat],
        Transition::Revealed { word } => vec![ServerMessage::Reveal { word }],
        Transition::Ended => vec![ServerMessage::End],
    }
}

pub fn encode(message: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(message) {
        Ok(text) => Some(Message::Text(text)),
        Err(e) => {
            error!("Failed to encode {} event: {}", message.event_name(), e);
            None
        }
    }
}

/// Sends `message` to every registered connection.
pub fn broadcast(clients: &ClientManager, message: &ServerMessage) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    let Some(frame) = encode(message) else {
        report.dropped = clients.len();
        return report;
    };

    for (id, sender) in clients.senders() {
        if deliver(&id, &sender, frame.clone()) {
            report.delivered += 1;
        } else {
            report.dropped += 1;
        }
    }

    debug!(
        "Broadcast {} to {} clients ({} dropped)",
        message.event_name(),
        report.delivered,
        report.dropped
    );
    report
}

/// Sends `message` to a single connection. Returns false if it could not be
/// queued.
pub fn send_to(clients: &ClientManager, id: &str, message: &ServerMessage) -> bool {
    match (clients.sender(id), encode(message)) {
        (Some(sender), Some(frame)) => deliver(id, &sender, frame),
        (None, _) => {
            debug!("Dropping {} for unknown client {}", message.event_name(), id);
            false
        }
        (_, None) => false,
    }
}

fn deliver(id: &str, sender: &Sender<Message>, frame: Message) -> bool {
    match sender.try_send(frame) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            warn!("Outbound queue full for client {}, dropping event", id);
            false
        }
        Err(TrySendError::Closed(_)) => {
            debug!("Client {} already closed", id);
            false
        }
    }
}
