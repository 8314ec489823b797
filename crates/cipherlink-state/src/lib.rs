//! Session state for cipherlink.
//!
//! This crate is the client's single source of truth for room, player,
//! turn, and conversation data:
//!
//! - **Model** ([`Player`], [`Room`], [`ConversationTurn`],
//!   [`GameSession`], [`ConnectionState`]) — the entities themselves.
//! - **Store** ([`SessionStore`], [`StateChange`]) — ownership of one
//!   instance of each, mutated through an enumerated, validated set of
//!   changes, observable through a watch-based revision counter.
//! - **Turn machine** ([`turn`]) — pure legality predicates over the
//!   model.
//! - **Similarity guard** ([`SimilarityGuard`]) — the edit-distance
//!   policy keeping the encryptor from leaking the secret word.
//!
//! No networking lives here; the connection layer writes transport
//! transitions in and everything else flows through the dispatcher.

mod error;
mod guard;
mod model;
mod store;
pub mod turn;

pub use error::StateError;
pub use guard::{
    DEFAULT_SIMILARITY_THRESHOLD, SimilarityGuard, levenshtein,
};
pub use model::{
    ConnectionState, ConversationTurn, DEFAULT_MAX_ROUNDS, GameSession,
    GameStatus, Player, ROOM_CAPACITY, Room, assign_provisional_roles,
};
pub use store::{SessionStore, StateChange};
