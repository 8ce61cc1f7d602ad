//! # Word Wall Client Library
//!
//! A terminal companion for the Word Wall session server. It can act as an
//! admin console, sending one command such as `start`, `mark` or `next` and
//! printing how the server answered, or as a passive viewer that joins the
//! roster and prints every broadcast as it arrives.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! WebSocket connection handling:
//! - Connecting and reading the initial session snapshot
//! - Encoding commands and decoding server events
//! - Request/response matching for admin commands
//!
//! ### Display Module (`display`)
//! Turns server events and snapshots into short human-readable lines.
//!
//! ### CLI Module (`cli`)
//! Command-line arguments and the mapping from subcommands to protocol
//! messages.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::Connection;
//! use shared::ClientMessage;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let mut connection = Connection::connect("ws://127.0.0.1:3001").await?;
//!     connection.handshake(Duration::from_secs(2)).await?;
//!
//!     let start = ClientMessage::start(Some("Alice".to_string()));
//!     for event in connection.request(&start, Duration::from_secs(2)).await? {
//!         println!("{}", client::display::describe(&event));
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod display;
pub mod network;
