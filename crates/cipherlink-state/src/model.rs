//! Session entities: players, rooms, the transcript, and game state.
//!
//! These are the client's projections of server-owned data. They carry
//! no networking; the store in [`crate::store`] owns one instance of
//! each and every other layer reads through it.

use chrono::{DateTime, Utc};

use cipherlink_protocol::{
    Actor, PlayerId, PlayerInfo, Role, ScoreBoard, WireMessage,
};

/// Rooms hold exactly two human players.
pub const ROOM_CAPACITY: usize = 2;

/// Rounds played before the game ends, unless the server says otherwise.
pub const DEFAULT_MAX_ROUNDS: u32 = 3;

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A player in the current room.
///
/// Created when the roster arrives, destroyed when the player leaves or
/// the session resets. The role starts provisional (inferred from join
/// order) and is overwritten by the server's authoritative assignment
/// when the game starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Server-assigned identity.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Ready flag, meaningful only while waiting.
    pub ready: bool,
    /// Assigned role; `None` until provisional or authoritative
    /// assignment happens.
    pub role: Option<Role>,
    /// Transport-session identifier, when known.
    pub session_id: Option<String>,
}

impl From<PlayerInfo> for Player {
    fn from(info: PlayerInfo) -> Self {
        Self {
            id: info.id,
            name: info.name,
            ready: info.ready,
            role: info.role,
            session_id: info.session_id,
        }
    }
}

/// Assigns provisional roles by join order: the first joiner encrypts,
/// the second decrypts. Players that already carry a role keep it, so
/// an authoritative assignment is never clobbered.
pub fn assign_provisional_roles(roster: &mut [Player]) {
    let order = [Role::Encryptor, Role::Decryptor];
    for (player, role) in roster.iter_mut().zip(order) {
        if player.role.is_none() {
            player.role = Some(role);
        }
    }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// Read-only projection of the server-side room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// The room's unique id.
    pub id: cipherlink_protocol::RoomId,
    /// Roster in join order.
    pub players: Vec<Player>,
    /// Maximum players; fixed at [`ROOM_CAPACITY`] for this game.
    pub capacity: usize,
}

impl Room {
    /// Creates a room projection from a wire roster, preserving join
    /// order. Role assignment is the store's call: provisional while
    /// waiting, preserved mid-game.
    pub fn from_roster(
        id: cipherlink_protocol::RoomId,
        roster: Vec<PlayerInfo>,
    ) -> Self {
        Self {
            id,
            players: roster.into_iter().map(Player::from).collect(),
            capacity: ROOM_CAPACITY,
        }
    }

    /// Number of players currently present.
    pub fn occupancy(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` when the room holds its full complement.
    pub fn is_full(&self) -> bool {
        self.players.len() >= self.capacity
    }

    /// Looks up a player by id.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// One entry in the game transcript.
///
/// The transcript is strictly append-only: turns are never reordered or
/// mutated after creation, only appended (or replaced wholesale by a
/// history refresh).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    /// Server-assigned id, used to correlate with history refreshes.
    pub id: String,
    /// Who authored the turn.
    pub kind: Actor,
    /// Textual content.
    pub content: String,
    /// Originating player; `None` for the automated agent.
    pub player_id: Option<PlayerId>,
    /// Creation time. Server-stamped when available, locally stamped
    /// otherwise.
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    /// Builds a turn from its wire form, stamping `now` when the
    /// server did not include a timestamp.
    pub fn from_wire(msg: WireMessage) -> Self {
        Self {
            id: msg.id,
            kind: msg.kind,
            content: msg.content,
            player_id: msg.player_id,
            timestamp: msg.timestamp.unwrap_or_else(Utc::now),
        }
    }
}

// ---------------------------------------------------------------------------
// Game status
// ---------------------------------------------------------------------------

/// The lifecycle of a game session.
///
/// Transitions are one-directional, no back-transitions:
///
/// ```text
/// Waiting → Active → Ended
/// ```
///
/// `Ended` is terminal; the only way forward is a full session reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    /// In the waiting room; ready toggles are legal.
    #[default]
    Waiting,
    /// The game is running; hint/guess turns cycle.
    Active,
    /// The game finished. No further transitions permitted.
    Ended,
}

impl GameStatus {
    /// The next state in the one-directional lifecycle, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Waiting => Some(Self::Active),
            Self::Active => Some(Self::Ended),
            Self::Ended => None,
        }
    }

    /// Returns `true` if moving to `target` respects the ordering.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Returns `true` while the game is running.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Active => write!(f, "active"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

// ---------------------------------------------------------------------------
// Game session
// ---------------------------------------------------------------------------

/// Aggregate game state for the current session.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    /// Lifecycle state.
    pub status: GameStatus,
    /// Current round, 0 before the first `game:roundStart`.
    pub round: u32,
    /// Upper bound on rounds.
    pub max_rounds: u32,
    /// Signed score: positive favors the humans, negative the agent.
    pub score: i32,
    /// The secret word. Populated only while `Active` and only for the
    /// encryptor (the server omits it from the decryptor's payloads);
    /// cleared on reset.
    pub secret_word: Option<String>,
    /// Whoever currently holds the exclusive right to act.
    pub turn: Option<Actor>,
    /// The agent's streamed reasoning fragments, buffered until its
    /// guess lands as a transcript turn.
    pub pending_ai_thoughts: Vec<String>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            status: GameStatus::Waiting,
            round: 0,
            max_rounds: DEFAULT_MAX_ROUNDS,
            score: 0,
            secret_word: None,
            turn: None,
            pending_ai_thoughts: Vec::new(),
        }
    }
}

impl GameSession {
    /// Applies a score report, replacing the running total.
    pub fn record_scores(&mut self, scores: ScoreBoard) {
        self.score = scores.total;
    }
}

// ---------------------------------------------------------------------------
// Connection state
// ---------------------------------------------------------------------------

/// Connectivity as observed by the connection manager.
///
/// Mutated exclusively by the connection manager; everyone else reads.
/// An explicit teardown resets it to disconnected with no error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionState {
    /// Whether a live transport exists right now.
    pub connected: bool,
    /// Identifier of the current transport, when connected.
    pub transport_id: Option<String>,
    /// Human-readable descriptor of the last failure, if any.
    pub error: Option<String>,
    /// Consecutive failed connection attempts since the last success.
    pub retry_attempts: u32,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cipherlink_protocol::RoomId;

    fn info(id: &str, name: &str) -> PlayerInfo {
        PlayerInfo {
            id: PlayerId::from(id),
            name: name.into(),
            ready: false,
            role: None,
            session_id: None,
        }
    }

    #[test]
    fn test_provisional_roles_follow_join_order() {
        let mut room = Room::from_roster(
            RoomId::from("r1"),
            vec![info("p1", "Alice"), info("p2", "Bob")],
        );
        assign_provisional_roles(&mut room.players);
        assert_eq!(room.players[0].role, Some(Role::Encryptor));
        assert_eq!(room.players[1].role, Some(Role::Decryptor));
    }

    #[test]
    fn test_provisional_roles_do_not_clobber_assigned_ones() {
        let mut roster = vec![
            Player {
                role: Some(Role::Decryptor),
                ..Player::from(info("p1", "Alice"))
            },
            Player::from(info("p2", "Bob")),
        ];
        assign_provisional_roles(&mut roster);
        // The first joiner keeps the server-assigned decryptor role.
        assert_eq!(roster[0].role, Some(Role::Decryptor));
        assert_eq!(roster[1].role, Some(Role::Decryptor));
    }

    #[test]
    fn test_room_occupancy_and_capacity() {
        let room =
            Room::from_roster(RoomId::from("r1"), vec![info("p1", "A")]);
        assert_eq!(room.occupancy(), 1);
        assert!(!room.is_full());
        assert_eq!(room.capacity, ROOM_CAPACITY);
    }

    #[test]
    fn test_game_status_is_one_directional() {
        assert_eq!(GameStatus::Waiting.next(), Some(GameStatus::Active));
        assert_eq!(GameStatus::Active.next(), Some(GameStatus::Ended));
        assert_eq!(GameStatus::Ended.next(), None);

        assert!(GameStatus::Waiting.can_transition_to(GameStatus::Active));
        assert!(!GameStatus::Active.can_transition_to(GameStatus::Waiting));
        assert!(!GameStatus::Ended.can_transition_to(GameStatus::Active));
        // No skipping straight to the end.
        assert!(!GameStatus::Waiting.can_transition_to(GameStatus::Ended));
    }

    #[test]
    fn test_conversation_turn_stamps_missing_timestamp() {
        let turn = ConversationTurn::from_wire(WireMessage {
            id: "m1".into(),
            kind: Actor::Encryptor,
            content: "a fruit".into(),
            player_id: Some(PlayerId::from("p1")),
            timestamp: None,
        });
        // Locally stamped: close enough to now to be in the past hour.
        assert!(Utc::now().signed_duration_since(turn.timestamp).num_hours() < 1);
    }

    #[test]
    fn test_game_session_initial_values() {
        let game = GameSession::default();
        assert_eq!(game.status, GameStatus::Waiting);
        assert_eq!(game.round, 0);
        assert_eq!(game.score, 0);
        assert!(game.secret_word.is_none());
        assert!(game.turn.is_none());
    }

    #[test]
    fn test_record_scores_replaces_total() {
        let mut game = GameSession::default();
        game.record_scores(ScoreBoard {
            total: -3,
            humans: 0,
            ai: 3,
        });
        assert_eq!(game.score, -3);
    }
}
