//! # cipherlink
//!
//! Client-side connection and session synchronization for the cipher
//! duel word game: two humans (an encryptor hinting at a secret word
//! and a decryptor guessing it) racing an automated agent, coordinated
//! by an authoritative server over one persistent WebSocket.
//!
//! The crate ties the layers together:
//!
//! ```text
//! transport (tokio-tungstenite)
//!     │ frames, arrival order
//!     ▼
//! ConnectionManager ── retry/backoff, error classification
//!     │ ServerEvent
//!     ▼
//! dispatch::reduce ── exhaustive event table, pure
//!     │ StateChange
//!     ▼
//! SessionStore (cipherlink-state) ── validated, observable
//! ```
//!
//! [`DuelClient`] is the public entry point; UI layers read the store,
//! subscribe to its revisions, and call intents that are gated locally
//! by the turn predicates and the similarity guard.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use cipherlink::{ClientConfig, DuelClient};
//!
//! # async fn run() -> Result<(), cipherlink::ClientError> {
//! let client = DuelClient::new(ClientConfig::new("http://localhost:3001"));
//! client.connect().await?;
//! let room = client.create_and_join("Alice").await?;
//! println!("joined {room}");
//! client.set_ready(true).await?;
//! # Ok(())
//! # }
//! ```

mod classify;
mod client;
mod config;
mod connection;
mod dispatch;
mod error;
pub mod rest;

pub use classify::{
    DisconnectReason, ErrorCategory, ErrorHint, classify,
    classify_disconnect, connect_failure_message, disconnect_message,
    retry_exhausted_message,
};
pub use client::DuelClient;
pub use config::{
    ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_RECONNECT_ATTEMPTS,
    DEFAULT_RECONNECT_DELAY,
};
pub use connection::{ConnectionManager, SharedStore};
pub use dispatch::reduce;
pub use error::ClientError;

// The wire and state vocabulary, re-exported so consumers rarely need
// the sub-crates directly.
pub use cipherlink_protocol::{
    Actor, ClientCommand, PlayerId, PlayerInfo, Role, RoomId, RoomSummary,
    ScoreBoard, ServerEvent, WireMessage, parse_ai_turn, render_ai_turn,
};
pub use cipherlink_state::{
    ConnectionState, ConversationTurn, GameSession, GameStatus, Player,
    Room, SessionStore, SimilarityGuard, StateChange, StateError, turn,
};
