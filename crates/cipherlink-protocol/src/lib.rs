//! Wire protocol for cipherlink.
//!
//! This crate defines the language the game client and server speak:
//!
//! - **Types** ([`PlayerId`], [`PlayerInfo`], [`ScoreBoard`], …) —
//!   identities and payload fragments shared by events and commands.
//! - **Events** ([`ServerEvent`]) — the closed union of everything the
//!   server can push.
//! - **Commands** ([`ClientCommand`]) — the closed union of everything
//!   the client can emit, with validating constructors.
//! - **Agent turns** ([`render_ai_turn`], [`parse_ai_turn`]) — the
//!   fixed textual layout of the automated agent's transcript entries.
//! - **Codec** ([`Codec`], [`JsonCodec`]) — how frames become bytes.
//!
//! The protocol layer knows nothing about sockets or session state; it
//! sits between the transport (raw frames) and the dispatcher (state
//! mutations).

mod ai;
mod codec;
mod command;
mod error;
mod event;
mod types;

pub use ai::{AiUtterance, parse_ai_turn, render_ai_turn};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use command::ClientCommand;
pub use error::ProtocolError;
pub use event::ServerEvent;
pub use types::{
    Actor, PlayerId, PlayerInfo, Role, RoomId, RoomSummary, ScoreBoard,
    WireMessage,
};
