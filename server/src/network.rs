//! Server network layer: WebSocket transport and the command loop
//!
//! Each accepted socket gets a reader task and a writer task. Readers decode
//! frames and forward them as [`NetworkEvent`]s to the single command loop in
//! [`Server::run`], which owns the game store and the connection registry and
//! handles one event at a time. Writers drain the bounded per-connection
//! queue the dispatcher fills.

use crate::client_manager::{generate_connection_id, ClientManager};
use crate::config::ServerConfig;
use crate::dispatcher::{broadcast, encode, events_for, send_to};
use crate::game::{Command, GameStore};
use crate::words::WordSource;
use futures_util::{SinkExt, Stream, StreamExt};
use log::{debug, error, info, warn};
use shared::{ClientMessage, ConnectionId, ServerMessage};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::interval;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Messages sent from connection tasks to the command loop
#[derive(Debug)]
pub enum NetworkEvent {
    Connected {
        id: ConnectionId,
        addr: SocketAddr,
        sender: mpsc::Sender<Message>,
    },
    Received {
        id: ConnectionId,
        message: ClientMessage,
    },
    Malformed {
        id: ConnectionId,
        reason: String,
    },
    Disconnected {
        id: ConnectionId,
    },
}

/// The session server
pub struct Server {
    listener: Arc<TcpListener>,
    local_addr: SocketAddr,
    clients: ClientManager,
    store: GameStore,
    outbound_buffer: usize,

    event_tx: mpsc::UnboundedSender<NetworkEvent>,
    event_rx: mpsc::UnboundedReceiver<NetworkEvent>,
}

impl Server {
    pub async fn new(config: &ServerConfig, words: Box<dyn WordSource>) -> Result<Self, BoxError> {
        let listener = TcpListener::bind(config.bind_address()).await?;
        let local_addr = listener.local_addr()?;
        info!("Server listening on {}", local_addr);

        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Ok(Server {
            listener: Arc::new(listener),
            local_addr,
            clients: ClientManager::new(config.max_clients),
            store: GameStore::new(words),
            outbound_buffer: config.outbound_buffer.max(1),
            event_tx,
            event_rx,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Spawns the task that accepts sockets and starts a connection task for
    /// each one
    fn spawn_acceptor(&self) {
        let listener = Arc::clone(&self.listener);
        let event_tx = self.event_tx.clone();
        let outbound_buffer = self.outbound_buffer;

        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, addr)) => {
                        let event_tx = event_tx.clone();
                        tokio::spawn(serve_connection(stream, addr, event_tx, outbound_buffer));
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Main loop. Every state mutation happens here, one event at a time.
    pub async fn run(&mut self) -> Result<(), BoxError> {
        self.spawn_acceptor();

        let mut stats_interval = interval(Duration::from_secs(60));

        info!("Server started successfully");

        loop {
            tokio::select! {
                event = self.event_rx.recv() => {
                    match event {
                        Some(event) => self.handle_event(event),
                        None => {
                            info!("Server shutting down");
                            break;
                        }
                    }
                },

                _ = stats_interval.tick() => {
                    debug!(
                        "{} clients connected, session {:?}",
                        self.clients.len(),
                        self.store.session().phase()
                    );
                },
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: NetworkEvent) {
        match event {
            NetworkEvent::Connected { id, addr, sender } => {
                if !self.clients.add_client(id.clone(), addr, sender.clone()) {
                    warn!("Rejecting connection from {}: server full", addr);
                    let reply = ServerMessage::Error {
                        message: "Server full".to_string(),
                    };
                    if let Some(frame) = encode(&reply) {
                        let _ = sender.try_send(frame);
                    }
                    return;
                }

                let state = ServerMessage::SessionState(self.store.state());
                send_to(&self.clients, &id, &state);
            }

            NetworkEvent::Received { id, message } => {
                if !self.clients.contains(&id) {
                    return;
                }
                debug!("Client {} sent {:?}", id, message);
                self.handle_message(&id, message);
            }

            NetworkEvent::Malformed { id, reason } => {
                if !self.clients.contains(&id) {
                    return;
                }
                warn!("Malformed message from {}: {}", id, reason);
                let reply = ServerMessage::Error {
                    message: format!("Malformed message: {}", reason),
                };
                send_to(&self.clients, &id, &reply);
            }

            NetworkEvent::Disconnected { id } => {
                if self.clients.remove_client(&id) {
                    self.publish_roster();
                }
            }
        }
    }

    fn handle_message(&mut self, id: &str, message: ClientMessage) {
        let command = match message {
            ClientMessage::PlayerJoin(payload) => {
                let name = payload.and_then(|p| p.name);
                self.clients.set_name(id, name.as_deref());
                self.publish_roster();
                return;
            }
            ClientMessage::SessionSync => {
                let state = ServerMessage::SessionState(self.store.state());
                send_to(&self.clients, id, &state);
                return;
            }
            ClientMessage::AdminStart(payload) => Command::Start {
                user_name: payload.and_then(|p| p.user_name),
            },
            ClientMessage::AdminMark { name, correct } => Command::Mark { name, correct },
            ClientMessage::AdminNext => Command::Next,
            ClientMessage::AdminRepeat => Command::Repeat,
            ClientMessage::AdminReveal => Command::Reveal,
            ClientMessage::AdminEnd => Command::End,
        };

        self.execute(id, command);
    }

    /// Applies an admin command. Accepted commands are broadcast to everyone,
    /// rejections go back to the issuer only.
    fn execute(&mut self, id: &str, command: Command) {
        match self.store.apply(command.clone()) {
            Ok(transition) => {
                for event in events_for(transition) {
                    broadcast(&self.clients, &event);
                }
            }
            Err(e) => {
                warn!("Rejected {:?} from {}: {}", command, id, e);
                let reply = ServerMessage::Error {
                    message: e.to_string(),
                };
                send_to(&self.clients, id, &reply);
            }
        }
    }

    fn publish_roster(&self) {
        let roster = ServerMessage::PlayersList(self.clients.roster());
        broadcast(&self.clients, &roster);
    }
}

/// Upgrades a socket to WebSocket and pumps frames until it closes
async fn serve_connection(
    stream: TcpStream,
    addr: SocketAddr,
    events: mpsc::UnboundedSender<NetworkEvent>,
    outbound_buffer: usize,
) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake with {} failed: {}", addr, e);
            return;
        }
    };

    let id = generate_connection_id();
    let (mut sink, frames) = ws_stream.split();
    let (sender, mut outbound) = mpsc::channel::<Message>(outbound_buffer);

    if events
        .send(NetworkEvent::Connected {
            id: id.clone(),
            addr,
            sender,
        })
        .is_err()
    {
        return;
    }

    // Ends once the registry drops its sender
    let writer = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if let Err(e) = sink.send(frame).await {
                debug!("Write to {} failed: {}", addr, e);
                break;
            }
        }
        let _ = sink.close().await;
    });

    forward_frames(frames, &id, &events, async {
        let _ = writer.await;
    })
    .await;

    let _ = events.send(NetworkEvent::Disconnected { id });
}

/// Decodes incoming frames into events until the peer goes away or `closed`
/// resolves. The writer finishing means the registry rejected or dropped the
/// connection, so nothing read afterwards would be handled.
async fn forward_frames<S, F>(
    mut frames: S,
    id: &str,
    events: &mpsc::UnboundedSender<NetworkEvent>,
    closed: F,
) where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
    F: Future<Output = ()>,
{
    tokio::pin!(closed);

    loop {
        let frame = tokio::select! {
            frame = frames.next() => frame,
            _ = &mut closed => {
                debug!("Outbound side of {} closed, stopping reader", id);
                break;
            }
        };

        let event = match frame {
            Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(message) => NetworkEvent::Received {
                    id: id.to_string(),
                    message,
                },
                Err(e) => NetworkEvent::Malformed {
                    id: id.to_string(),
                    reason: e.to_string(),
                },
            },
            Some(Ok(Message::Close(_))) | None => break,
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                debug!("Read from {} failed: {}", id, e);
                break;
            }
        };

        if events.send(event).is_err() {
            break;
        }
    }
}
