//! # Word Wall Session Server
//!
//! The authoritative server for the Word Wall party game. A shared display
//! flashes the letters of a secret word while an admin marks whether the
//! current participant guessed it. This crate is the single source of truth
//! for that game: it decides whether a session is running, who owns it, how
//! many chances remain, whether the current word has been scored, and what
//! the leaderboard says. Every change is broadcast to all connected display
//! and viewer clients.
//!
//! ## Core Responsibilities
//!
//! ### Session State
//! One session exists system-wide. It moves from idle to active on `start`,
//! through mark/next rounds, to completed when the twelfth chance is used up,
//! and back to idle on `end`. The leaderboard accumulates correct marks per
//! name for the lifetime of the process.
//!
//! ### Command Validation
//! Admin commands are checked against the live session before anything is
//! mutated. A rejected command changes nothing and is answered with an
//! `error` event sent to the issuing connection only.
//!
//! ### Broadcasting
//! Accepted commands produce events that are queued to every connection.
//! Queues are bounded and sends never wait, so one slow viewer cannot hold up
//! the game.
//!
//! ## Architecture Design
//!
//! ### Single Command Loop
//! Connection tasks only decode frames. All of them feed one loop that owns
//! the store and the registry and processes events strictly in order, so no
//! two commands ever interleave and every client sees the same sequence.
//!
//! ### WebSocket Transport
//! Messages are JSON text frames shaped as `{"event": ..., "data": ...}`,
//! which browser display clients can consume directly.
//!
//! ## Module Organization
//!
//! - `session`: the session record and leaderboard
//! - `validator`: legality checks for admin commands
//! - `game`: the store that applies commands and selects words
//! - `dispatcher`: transition-to-event mapping and fan-out
//! - `client_manager`: the connection registry
//! - `words`: word sources and the deterministic fallback
//! - `network`: WebSocket transport and the command loop
//! - `config`: command-line and environment configuration
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::ServerConfig;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = ServerConfig::default();
//!     let words = config.word_source()?;
//!     let mut server = Server::new(&config, words).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod game;
pub mod network;
pub mod session;
pub mod validator;
pub mod words;
