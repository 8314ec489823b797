//! Shared wire types: identities, roles, and payload fragments.
//!
//! Everything in this module travels on the wire in some event or
//! command, so each type pins down its exact JSON shape with serde
//! attributes. The server speaks camelCase; field renames happen at
//! the enum/struct boundary, never by hand in handlers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique, opaque identifier for a player.
///
/// The server mints these (they are transport-session derived, not
/// sequential), so the client treats them as plain strings. The newtype
/// keeps a `PlayerId` from being confused with a `RoomId` in signatures.
///
/// `#[serde(transparent)]` makes `PlayerId("p1".into())` serialize as
/// just `"p1"`, matching what the server sends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Returns the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player:{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A unique, opaque identifier for a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Returns the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room:{}", self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Roles and actors
// ---------------------------------------------------------------------------

/// The role a human player holds for the duration of a game.
///
/// The encryptor gives hints toward the secret word; the decryptor
/// submits guesses. Wire form is lowercase (`"encryptor"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Encryptor,
    Decryptor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encryptor => write!(f, "encryptor"),
            Self::Decryptor => write!(f, "decryptor"),
        }
    }
}

/// Anyone who can hold the turn or author a conversation turn:
/// either human role, or the automated agent racing the decryptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    Encryptor,
    Ai,
    Decryptor,
}

impl Actor {
    /// The actor corresponding to a human role.
    pub fn from_role(role: Role) -> Self {
        match role {
            Role::Encryptor => Self::Encryptor,
            Role::Decryptor => Self::Decryptor,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encryptor => write!(f, "encryptor"),
            Self::Ai => write!(f, "ai"),
            Self::Decryptor => write!(f, "decryptor"),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload fragments
// ---------------------------------------------------------------------------

/// Wire projection of a player, as embedded in room and game events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    /// Server-assigned player id.
    pub id: PlayerId,
    /// Display name chosen at join time.
    pub name: String,
    /// Whether the player has toggled ready in the waiting room.
    #[serde(default)]
    pub ready: bool,
    /// Role, once assigned. Absent while the server has not decided.
    #[serde(default)]
    pub role: Option<Role>,
    /// Transport-session identifier, when the server includes it.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// One entry in a room listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    /// The room's unique id.
    pub id: RoomId,
    /// Number of players currently in the room.
    pub player_count: usize,
    /// Maximum players allowed (two for this game).
    pub capacity: usize,
}

/// Score state as reported by round-end and game-end events.
///
/// `total` is signed: positive favors the humans, negative favors the
/// automated agent, zero is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBoard {
    pub total: i32,
    /// Points the humans earned this round, when present.
    #[serde(default)]
    pub humans: i32,
    /// Points the agent earned this round, when present.
    #[serde(default)]
    pub ai: i32,
}

/// A single conversation entry as carried by message events.
///
/// `player_id` is absent for turns authored by the automated agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    /// Server-assigned message id.
    pub id: String,
    /// Who authored this entry.
    #[serde(rename = "type")]
    pub kind: Actor,
    /// Textual content.
    pub content: String,
    /// Originating player, absent for `kind == Actor::Ai`.
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    /// Creation time, when the server stamps one.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Wire-shape tests. The server's JSON is the contract; a serde
    //! attribute drifting out of sync breaks every event that embeds
    //! these fragments, so each shape is pinned here.

    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&PlayerId::from("p-1")).unwrap();
        assert_eq!(json, "\"p-1\"");
    }

    #[test]
    fn test_room_id_round_trip() {
        let id = RoomId::from("r-9");
        let json = serde_json::to_string(&id).unwrap();
        let back: RoomId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Encryptor).unwrap(),
            "\"encryptor\""
        );
        assert_eq!(
            serde_json::to_string(&Role::Decryptor).unwrap(),
            "\"decryptor\""
        );
    }

    #[test]
    fn test_actor_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Actor::Ai).unwrap(), "\"ai\"");
    }

    #[test]
    fn test_actor_from_role() {
        assert_eq!(Actor::from_role(Role::Encryptor), Actor::Encryptor);
        assert_eq!(Actor::from_role(Role::Decryptor), Actor::Decryptor);
    }

    #[test]
    fn test_player_info_uses_camel_case_fields() {
        let info = PlayerInfo {
            id: PlayerId::from("p1"),
            name: "Alice".into(),
            ready: true,
            role: Some(Role::Encryptor),
            session_id: Some("sess-1".into()),
        };
        let json: serde_json::Value = serde_json::to_value(&info).unwrap();
        assert_eq!(json["id"], "p1");
        assert_eq!(json["sessionId"], "sess-1");
        assert_eq!(json["role"], "encryptor");
    }

    #[test]
    fn test_player_info_optional_fields_default() {
        // Joining players arrive without role or session id.
        let json = r#"{"id": "p2", "name": "Bob"}"#;
        let info: PlayerInfo = serde_json::from_str(json).unwrap();
        assert!(!info.ready);
        assert!(info.role.is_none());
        assert!(info.session_id.is_none());
    }

    #[test]
    fn test_wire_message_kind_field_named_type() {
        let json = r#"{"id": "m1", "type": "ai", "content": "hm"}"#;
        let msg: WireMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.kind, Actor::Ai);
        assert!(msg.player_id.is_none());
        assert!(msg.timestamp.is_none());
    }

    #[test]
    fn test_room_summary_round_trip() {
        let entry = RoomSummary {
            id: RoomId::from("r1"),
            player_count: 1,
            capacity: 2,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"playerCount\":1"));
        let back: RoomSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }

    #[test]
    fn test_score_board_defaults_round_fields() {
        let json = r#"{"total": -2}"#;
        let scores: ScoreBoard = serde_json::from_str(json).unwrap();
        assert_eq!(scores.total, -2);
        assert_eq!(scores.humans, 0);
        assert_eq!(scores.ai, 0);
    }
}
