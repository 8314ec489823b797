//! Error types for the state layer.

use cipherlink_protocol::PlayerId;

use crate::model::GameStatus;

/// Errors raised when a [`StateChange`](crate::StateChange) is illegal
/// in the current state. The store is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// A room-scoped change arrived while no room is joined.
    #[error("no room joined")]
    NoRoom,

    /// The roster already holds its full complement.
    #[error("room is full ({capacity} players)")]
    RoomFull { capacity: usize },

    /// The player is already on the roster.
    #[error("player {0} already in the room")]
    DuplicatePlayer(PlayerId),

    /// The player is not on the roster.
    #[error("player {0} not in the room")]
    UnknownPlayer(PlayerId),

    /// The game lifecycle only moves forward.
    #[error("illegal game status transition: {from} -> {to}")]
    InvalidStatusTransition { from: GameStatus, to: GameStatus },

    /// The game has ended; the transcript is closed.
    #[error("game has ended")]
    GameOver,
}
