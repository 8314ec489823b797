//! The session store: single source of truth for all session data.
//!
//! Every other layer reads through the store's accessors and mutates
//! exclusively through [`SessionStore::apply`] with a [`StateChange`]
//! variant. There is no field-level poking from outside: each change is
//! validated before application, applied as a whole-field replacement,
//! and followed by a revision bump that wakes watch subscribers. That
//! keeps consumers from ever observing a torn intermediate state.
//!
//! ```text
//!  dispatcher ──reduce(event)──▶ Vec<StateChange> ─┐
//!                                                  ├──▶ apply() ──▶ revision++
//!  connection manager ──transport transitions─────┘
//! ```
//!
//! The store itself is not thread-safe; the client layer owns it behind
//! an async mutex and applies one event's changes under one lock
//! acquisition.

use std::collections::HashMap;

use tokio::sync::watch;

use cipherlink_protocol::{
    Actor, PlayerId, PlayerInfo, Role, RoomId, RoomSummary, ScoreBoard,
    WireMessage, render_ai_turn,
};

use crate::model::{
    ConnectionState, ConversationTurn, GameSession, GameStatus, Player, Room,
    assign_provisional_roles,
};
use crate::StateError;

// ---------------------------------------------------------------------------
// StateChange
// ---------------------------------------------------------------------------

/// The enumerated set of mutations the store accepts.
///
/// Connection variants are written by the connection manager; the rest
/// are produced by the dispatcher's event handlers. Nothing else writes.
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    // -- Connectivity (connection manager only) --
    /// A transport came up: record its id, clear errors, zero retries.
    TransportConnected { transport_id: String },
    /// A connection attempt failed: record the classified descriptor
    /// and count the attempt.
    TransportFailed { message: String },
    /// The live transport went away, with a classified descriptor
    /// (`None` for a silent client-side teardown).
    TransportDisconnected { message: Option<String> },
    /// Overwrite the connectivity error descriptor (terminal retry
    /// messages).
    ConnectionErrorSet { message: String },
    /// Restore connectivity state to its initial value.
    ConnectionReset,

    // -- Room lifecycle --
    /// Enter (or refresh) a room wholesale from a wire roster.
    /// `self_id` identifies this client when the event says so.
    RoomEntered {
        room_id: RoomId,
        players: Vec<PlayerInfo>,
        self_id: Option<PlayerId>,
    },
    /// Leave the current room, dropping all room-scoped state.
    RoomDeparted,
    /// A player entered the current room.
    PlayerJoined { player: PlayerInfo },
    /// A player left the current room.
    PlayerLeft { player_id: PlayerId },
    /// A player toggled ready.
    PlayerReadySet { player_id: PlayerId, ready: bool },
    /// Replace the joinable-room listing.
    RoomListReplaced { rooms: Vec<RoomSummary> },

    // -- Game lifecycle --
    /// Overwrite roles with the server's authoritative mapping.
    RolesAssigned { roles: HashMap<PlayerId, Role> },
    /// Move the game lifecycle forward. Applying the current status
    /// again is a no-op; back-transitions are rejected.
    StatusChanged { status: GameStatus },
    /// Replace the secret word (None clears it).
    SecretWordSet { word: Option<String> },
    /// A round began; `word` is present only for the encryptor.
    RoundStarted { round: u32, word: Option<String> },
    /// Replace the score with a server report.
    ScoresRecorded { scores: ScoreBoard },
    /// The turn holder changed (None between turns).
    TurnChanged { turn: Option<Actor> },

    // -- Conversation --
    /// Append one transcript entry.
    TurnAppended { message: WireMessage },
    /// Replace the transcript wholesale. Idempotent: replaying the
    /// same payload yields the same transcript, not a longer one.
    ConversationReplaced { messages: Vec<WireMessage> },
    /// Buffer a streamed fragment of the agent's reasoning.
    AiThoughtBuffered { content: String },
    /// The agent committed a guess: append its single transcript turn,
    /// rendered from `thinking` (or the buffered fragments when
    /// `thinking` is empty), and clear the buffer.
    AiTurnCommitted {
        thinking: Vec<String>,
        guess: String,
    },

    // -- Application errors --
    /// A server-reported error descriptor. Connectivity is untouched.
    ErrorReported { message: String },
    /// Clear the application error descriptor.
    ErrorCleared,
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// Owns every session entity; see the module docs for the write path.
#[derive(Debug)]
pub struct SessionStore {
    room: Option<Room>,
    self_id: Option<PlayerId>,
    conversation: Vec<ConversationTurn>,
    game: GameSession,
    connection: ConnectionState,
    available_rooms: Vec<RoomSummary>,
    last_error: Option<String>,
    revision: u64,
    notify: watch::Sender<u64>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Creates a store with every field at its initial value.
    pub fn new() -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            room: None,
            self_id: None,
            conversation: Vec::new(),
            game: GameSession::default(),
            connection: ConnectionState::default(),
            available_rooms: Vec::new(),
            last_error: None,
            revision: 0,
            notify,
        }
    }

    // -- Accessors --------------------------------------------------------

    /// The current room projection, if joined.
    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    /// This client's player id, once a join succeeded.
    pub fn self_id(&self) -> Option<&PlayerId> {
        self.self_id.as_ref()
    }

    /// This client's player entry in the roster.
    pub fn self_player(&self) -> Option<&Player> {
        let id = self.self_id.as_ref()?;
        self.room.as_ref()?.player(id)
    }

    /// This client's role, provisional or authoritative.
    pub fn self_role(&self) -> Option<Role> {
        self.self_player().and_then(|p| p.role)
    }

    /// The transcript in arrival order.
    pub fn conversation(&self) -> &[ConversationTurn] {
        &self.conversation
    }

    /// Aggregate game state.
    pub fn game(&self) -> &GameSession {
        &self.game
    }

    /// Connectivity as last reported by the connection manager.
    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    /// The last joinable-room listing.
    pub fn available_rooms(&self) -> &[RoomSummary] {
        &self.available_rooms
    }

    /// The last application-error descriptor, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Monotonic revision counter, bumped on every applied change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Subscribes to revision bumps. Receivers see the revision value;
    /// they re-read whatever fields they care about on change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    // -- Mutation ---------------------------------------------------------

    /// Validates and applies one change, then bumps the revision.
    ///
    /// # Errors
    /// Returns a [`StateError`] and leaves the store untouched when the
    /// change is illegal in the current state (unknown player, full
    /// room, backwards status transition, append after game end).
    pub fn apply(&mut self, change: StateChange) -> Result<(), StateError> {
        match change {
            StateChange::TransportConnected { transport_id } => {
                self.connection = ConnectionState {
                    connected: true,
                    transport_id: Some(transport_id),
                    error: None,
                    retry_attempts: 0,
                };
            }
            StateChange::TransportFailed { message } => {
                self.connection = ConnectionState {
                    connected: false,
                    transport_id: None,
                    error: Some(message),
                    retry_attempts: self.connection.retry_attempts + 1,
                };
            }
            StateChange::TransportDisconnected { message } => {
                self.connection = ConnectionState {
                    connected: false,
                    transport_id: None,
                    error: message,
                    retry_attempts: self.connection.retry_attempts,
                };
            }
            StateChange::ConnectionErrorSet { message } => {
                self.connection.error = Some(message);
            }
            StateChange::ConnectionReset => {
                self.connection = ConnectionState::default();
            }

            StateChange::RoomEntered {
                room_id,
                players,
                self_id,
            } => {
                let mut room = Room::from_roster(room_id, players);
                if self.game.status == GameStatus::Waiting {
                    assign_provisional_roles(&mut room.players);
                } else if let Some(old_room) = &self.room {
                    // Mid-game refreshes never reshuffle roles; the
                    // authoritative mapping already stands.
                    for player in &mut room.players {
                        if player.role.is_none() {
                            player.role = old_room
                                .player(&player.id)
                                .and_then(|old| old.role);
                        }
                    }
                }
                self.room = Some(room);
                if self_id.is_some() {
                    self.self_id = self_id;
                }
            }
            StateChange::RoomDeparted => {
                self.room = None;
                self.self_id = None;
                self.conversation = Vec::new();
                self.game = GameSession::default();
            }
            StateChange::PlayerJoined { player } => {
                let room =
                    self.room.as_mut().ok_or(StateError::NoRoom)?;
                if room.player(&player.id).is_some() {
                    return Err(StateError::DuplicatePlayer(player.id));
                }
                if room.is_full() {
                    return Err(StateError::RoomFull {
                        capacity: room.capacity,
                    });
                }
                room.players.push(Player::from(player));
                if self.game.status == GameStatus::Waiting {
                    assign_provisional_roles(&mut room.players);
                }
            }
            StateChange::PlayerLeft { player_id } => {
                let room =
                    self.room.as_mut().ok_or(StateError::NoRoom)?;
                let before = room.players.len();
                room.players.retain(|p| p.id != player_id);
                if room.players.len() == before {
                    return Err(StateError::UnknownPlayer(player_id));
                }
            }
            StateChange::PlayerReadySet { player_id, ready } => {
                let room =
                    self.room.as_mut().ok_or(StateError::NoRoom)?;
                let player = room
                    .players
                    .iter_mut()
                    .find(|p| p.id == player_id)
                    .ok_or(StateError::UnknownPlayer(player_id))?;
                player.ready = ready;
            }
            StateChange::RoomListReplaced { rooms } => {
                self.available_rooms = rooms;
            }

            StateChange::RolesAssigned { roles } => {
                let room =
                    self.room.as_mut().ok_or(StateError::NoRoom)?;
                for player in &mut room.players {
                    if let Some(role) = roles.get(&player.id) {
                        player.role = Some(*role);
                    }
                }
            }
            StateChange::StatusChanged { status } => {
                if status != self.game.status
                    && !self.game.status.can_transition_to(status)
                {
                    return Err(StateError::InvalidStatusTransition {
                        from: self.game.status,
                        to: status,
                    });
                }
                self.game.status = status;
            }
            StateChange::SecretWordSet { word } => {
                self.game.secret_word = word;
            }
            StateChange::RoundStarted { round, word } => {
                self.game.round = round;
                if word.is_some() {
                    self.game.secret_word = word;
                }
            }
            StateChange::ScoresRecorded { scores } => {
                self.game.record_scores(scores);
            }
            StateChange::TurnChanged { turn } => {
                self.game.turn = turn;
            }

            StateChange::TurnAppended { message } => {
                if self.game.status == GameStatus::Ended {
                    return Err(StateError::GameOver);
                }
                self.conversation
                    .push(ConversationTurn::from_wire(message));
            }
            StateChange::ConversationReplaced { messages } => {
                self.conversation = messages
                    .into_iter()
                    .map(ConversationTurn::from_wire)
                    .collect();
            }
            StateChange::AiThoughtBuffered { content } => {
                self.game.pending_ai_thoughts.push(content);
            }
            StateChange::AiTurnCommitted { thinking, guess } => {
                if self.game.status == GameStatus::Ended {
                    return Err(StateError::GameOver);
                }
                let thoughts = if thinking.is_empty() {
                    std::mem::take(&mut self.game.pending_ai_thoughts)
                } else {
                    self.game.pending_ai_thoughts.clear();
                    thinking
                };
                let content = render_ai_turn(&thoughts, &guess);
                self.conversation.push(ConversationTurn {
                    id: format!("ai-{}", self.conversation.len()),
                    kind: Actor::Ai,
                    content,
                    player_id: None,
                    timestamp: chrono::Utc::now(),
                });
            }

            StateChange::ErrorReported { message } => {
                self.last_error = Some(message);
            }
            StateChange::ErrorCleared => {
                self.last_error = None;
            }
        }

        self.bump();
        Ok(())
    }

    /// Restores every field to its initial value in one step.
    pub fn reset(&mut self) {
        self.room = None;
        self.self_id = None;
        self.conversation = Vec::new();
        self.game = GameSession::default();
        self.connection = ConnectionState::default();
        self.available_rooms = Vec::new();
        self.last_error = None;
        self.bump();
        tracing::debug!("session store reset");
    }

    fn bump(&mut self) {
        self.revision += 1;
        // Subscribers may all be gone; that is fine.
        let _ = self.notify.send(self.revision);
    }
}

// =========================================================================
// Tests
// =========================================================================
