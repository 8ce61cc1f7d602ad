//! Connection registry
//!
//! Tracks every connected display, viewer and admin socket together with the
//! presence name it announced through `player:join`. The registry has no
//! relation to game state; it exists so the server can publish the roster and
//! so the dispatcher has somewhere to find each connection's outbound queue.

use log::info;
use rand::distributions::Alphanumeric;
use rand::Rng;
use shared::{ConnectionId, PlayerInfo};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

const CONNECTION_ID_LEN: usize = 20;

/// Generates a random alphanumeric connection id.
pub fn generate_connection_id() -> ConnectionId {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CONNECTION_ID_LEN)
        .map(char::from)
        .collect()
}

/// Name given to a viewer that joins without one.
pub fn default_player_name(id: &str) -> String {
    let prefix: String = id.chars().take(4).collect();
    format!("Player-{}", prefix)
}

/// A connected socket and its presence metadata
#[derive(Debug)]
pub struct Client {
    pub id: ConnectionId,
    pub addr: SocketAddr,
    /// Set by `player:join`; `None` until then
    pub name: Option<String>,
    pub connected_at: Instant,
    /// Connection order, used to keep the roster stable
    seq: u64,
    /// Outbound queue drained by the connection's writer task
    pub sender: mpsc::Sender<Message>,
}

impl Client {
    pub fn new(id: ConnectionId, addr: SocketAddr, seq: u64, sender: mpsc::Sender<Message>) -> Self {
        Self {
            id,
            addr,
            name: None,
            connected_at: Instant::now(),
            seq,
            sender,
        }
    }

    pub fn info(&self) -> PlayerInfo {
        PlayerInfo {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Manages all connected clients.
///
/// Enforces the connection limit and hands out snapshots of the current
/// subscribers so a broadcast never observes a half-applied connect or
/// disconnect.
pub struct ClientManager {
    clients: HashMap<ConnectionId, Client>,
    next_seq: u64,
    max_clients: usize,
}

impl ClientManager {
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: HashMap::new(),
            next_seq: 0,
            max_clients,
        }
    }

    /// Registers a new connection. Returns false when the server is at
    /// capacity or the id is already taken.
    pub fn add_client(
        &mut self,
        id: ConnectionId,
        addr: SocketAddr,
        sender: mpsc::Sender<Message>,
    ) -> bool {
        if self.clients.len() >= self.max_clients || self.clients.contains_key(&id) {
            return false;
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        info!("Client {} connected from {}", id, addr);
        self.clients
            .insert(id.clone(), Client::new(id, addr, seq, sender));
        true
    }

    pub fn remove_client(&mut self, id: &str) -> bool {
        if let Some(client) = self.clients.remove(id) {
            info!(
                "Client {} disconnected after {:.1}s",
                client.id,
                client.connected_at.elapsed().as_secs_f32()
            );
            true
        } else {
            false
        }
    }

    /// Records the presence name for a connection, substituting a default when
    /// the requested one is missing or blank. Returns the name that was set.
    pub fn set_name(&mut self, id: &str, requested: Option<&str>) -> Option<String> {
        let client = self.clients.get_mut(id)?;
        let name = requested
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_player_name(id));

        info!("Client {} joined as {}", id, name);
        client.name = Some(name.clone());
        Some(name)
    }

    /// Every connection, in the order they connected.
    pub fn roster(&self) -> Vec<PlayerInfo> {
        let mut clients: Vec<&Client> = self.clients.values().collect();
        clients.sort_by_key(|c| c.seq);
        clients.into_iter().map(Client::info).collect()
    }

    /// Snapshot of all outbound queues.
    pub fn senders(&self) -> Vec<(ConnectionId, mpsc::Sender<Message>)> {
        self.clients
            .values()
            .map(|c| (c.id.clone(), c.sender.clone()))
            .collect()
    }

    pub fn sender(&self, id: &str) -> Option<mpsc::Sender<Message>> {
        self.clients.get(id).map(|c| c.sender.clone())
    }

    pub fn get(&self, id: &str) -> Option<&Client> {
        self.clients.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.clients.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
