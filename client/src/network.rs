use futures_util::{SinkExt, StreamExt};
use log::{debug, info};
use shared::{ClientMessage, ServerMessage, SessionState};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{timeout, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

/// How long to keep listening after the expected reply arrives, to pick up
/// follow-up events such as `admin:sessionCompleted`.
const SETTLE_WINDOW: Duration = Duration::from_millis(150);

/// A WebSocket connection to the session server
pub struct Connection {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Connection {
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        info!("Connecting to {}", url);
        let (socket, _) = connect_async(url).await?;
        Ok(Connection { socket })
    }

    /// Waits for the snapshot the server sends to every new connection.
    pub async fn handshake(&mut self, wait: Duration) -> Result<SessionState, ClientError> {
        match self.recv_timeout(wait).await? {
            Some(ServerMessage::SessionState(state)) => Ok(state),
            Some(ServerMessage::Error { message }) => Err(message.into()),
            Some(other) => Err(format!("expected session state, got {}", other.event_name()).into()),
            None => Err("server closed the connection before sending state".into()),
        }
    }

    pub async fn send(&mut self, message: &ClientMessage) -> Result<(), ClientError> {
        let text = serde_json::to_string(message)?;
        debug!("Sending {}", text);
        self.socket.send(Message::Text(text)).await?;
        Ok(())
    }

    /// Next event from the server, or `None` once the connection closes.
    pub async fn recv(&mut self) -> Result<Option<ServerMessage>, ClientError> {
        while let Some(frame) = self.socket.next().await {
            match frame? {
                Message::Text(text) => return Ok(Some(serde_json::from_str(&text)?)),
                Message::Close(_) => return Ok(None),
                _ => continue,
            }
        }
        Ok(None)
    }

    /// Like [`recv`](Self::recv) but gives up after `wait`.
    pub async fn recv_timeout(&mut self, wait: Duration) -> Result<Option<ServerMessage>, ClientError> {
        match timeout(wait, self.recv()).await {
            Ok(result) => result,
            Err(_) => Ok(None),
        }
    }

    /// Sends a command and collects events until the server answers it,
    /// either with the matching broadcast or with an error.
    pub async fn request(
        &mut self,
        message: &ClientMessage,
        wait: Duration,
    ) -> Result<Vec<ServerMessage>, ClientError> {
        self.send(message).await?;

        let expected = expected_reply(message);
        let deadline = Instant::now() + wait;
        let mut received = Vec::new();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let Some(event) = self.recv_timeout(remaining).await? else {
                return Err(format!("no {} reply within {:?}", expected, wait).into());
            };

            let done = event.event_name() == expected || event.event_name() == "error";
            received.push(event);
            if done {
                break;
            }
        }

        while let Some(event) = self.recv_timeout(SETTLE_WINDOW).await? {
            received.push(event);
        }

        Ok(received)
    }

    pub async fn close(mut self) -> Result<(), ClientError> {
        self.socket.close(None).await?;
        Ok(())
    }
}

/// The event that confirms a command was applied.
pub fn expected_reply(message: &ClientMessage) -> &'static str {
    match message {
        ClientMessage::AdminStart(_) => "start",
        ClientMessage::AdminNext => "next",
        ClientMessage::AdminRepeat => "repeat",
        ClientMessage::AdminReveal => "reveal",
        ClientMessage::AdminEnd => "end",
        ClientMessage::AdminMark { .. } => "score",
        ClientMessage::PlayerJoin(_) => "players:list",
        ClientMessage::SessionSync => "session:state",
    }
}
