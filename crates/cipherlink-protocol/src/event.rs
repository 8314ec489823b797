//! Inbound events: everything the server can push to the client.
//!
//! [`ServerEvent`] is a closed tagged union, so the dispatcher matches
//! on it exhaustively and a new event is a compile-time-checked
//! addition, not a string key that silently falls through. The serde
//! representation is adjacently tagged:
//!
//! ```json
//! { "event": "game:turnStart", "data": { "turn": "encryptor" } }
//! ```
//!
//! Transport lifecycle transitions (connect, disconnect, connect_error)
//! are not wire frames and never appear here; the connection manager
//! reports those into session state directly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Actor, PlayerId, PlayerInfo, Role, RoomId, RoomSummary, ScoreBoard, WireMessage};

/// A server-to-client event, one variant per wire event name.
///
/// Payload fields mirror the server's camelCase JSON. Optional fields
/// default rather than fail: the server omits the secret word from the
/// decryptor's payloads, and the agent's thinking trace from terse
/// guess events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    // -- Room lifecycle --
    /// This client's join request succeeded. `players` is the roster
    /// in join order, `player_id` identifies this client within it.
    #[serde(rename = "join_room_success")]
    JoinRoomSuccess {
        room_id: RoomId,
        players: Vec<PlayerInfo>,
        player_id: PlayerId,
    },

    /// This client left its room (acknowledgment of `room:leave`).
    #[serde(rename = "room:left")]
    RoomLeft,

    /// Another player entered the room.
    #[serde(rename = "room:playerJoined")]
    PlayerJoined { player: PlayerInfo },

    /// A player left the room.
    #[serde(rename = "room:playerLeft")]
    PlayerLeft { player_id: PlayerId },

    /// A player toggled their ready flag.
    #[serde(rename = "room:playerReady")]
    PlayerReady { player_id: PlayerId, ready: bool },

    /// Listing of joinable rooms.
    #[serde(rename = "room_list")]
    RoomList { rooms: Vec<RoomSummary> },

    /// Broadcast roster refresh: a player joined somewhere in the room
    /// and the server resends the full roster.
    #[serde(rename = "player_joined")]
    RosterUpdate {
        room_id: RoomId,
        player: PlayerInfo,
        players: Vec<PlayerInfo>,
    },

    // -- Game lifecycle --
    /// The game started. `roles` is the authoritative assignment and
    /// overwrites any provisional one. `secret_word` is present only
    /// in the encryptor's payload; the server omits it for the
    /// decryptor.
    #[serde(rename = "game:started", alias = "start_game")]
    GameStarted {
        players: Vec<PlayerInfo>,
        roles: HashMap<PlayerId, Role>,
        #[serde(default)]
        secret_word: Option<String>,
    },

    /// The game ended. Terminal: no further game transitions follow.
    #[serde(rename = "game:ended")]
    GameEnded {
        scores: ScoreBoard,
        #[serde(default)]
        winner: Option<String>,
    },

    /// A new round began. `word` is present only for the encryptor.
    #[serde(rename = "game:roundStart")]
    RoundStart {
        round: u32,
        #[serde(default)]
        word: Option<String>,
        #[serde(default)]
        role: Option<Role>,
    },

    /// A round finished; `scores` carries the updated totals.
    #[serde(rename = "game:roundEnd")]
    RoundEnd { round: u32, scores: ScoreBoard },

    /// The turn passed to `turn`.
    #[serde(rename = "game:turnStart")]
    TurnStart { turn: Actor },

    /// The current turn ended without a new holder yet.
    #[serde(rename = "game:turnEnd")]
    TurnEnd,

    // -- Conversation --
    /// A single conversation entry to append.
    #[serde(rename = "game:message")]
    Message { message: WireMessage },

    /// The full transcript, replacing local history wholesale. Sent
    /// after reconnect or late join; replaying it is idempotent.
    #[serde(rename = "game:messageHistory")]
    MessageHistory { messages: Vec<WireMessage> },

    // -- Automated agent --
    /// A fragment of the agent's reasoning, streamed while it decides.
    #[serde(rename = "game:aiThinking")]
    AiThinking { content: String },

    /// The agent committed to a guess. `thinking` may carry the full
    /// trace; when empty, the streamed fragments stand in for it.
    #[serde(rename = "game:aiGuess")]
    AiGuess {
        #[serde(default)]
        thinking: Vec<String>,
        guess: String,
        #[serde(default)]
        confidence: Option<f32>,
    },

    // -- Application errors --
    /// Server-reported application error. Does not affect connectivity.
    #[serde(rename = "error")]
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> ServerEvent {
        serde_json::from_str(json).expect("event should decode")
    }

    #[test]
    fn test_join_room_success_decodes_wire_shape() {
        let event = decode(
            r#"{
                "event": "join_room_success",
                "data": {
                    "roomId": "r1",
                    "players": [{"id": "p1", "name": "Alice"}],
                    "playerId": "p1"
                }
            }"#,
        );
        match event {
            ServerEvent::JoinRoomSuccess {
                room_id,
                players,
                player_id,
            } => {
                assert_eq!(room_id, RoomId::from("r1"));
                assert_eq!(players.len(), 1);
                assert_eq!(player_id, PlayerId::from("p1"));
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_unit_variant_decodes_without_data() {
        let event = decode(r#"{"event": "room:left"}"#);
        assert_eq!(event, ServerEvent::RoomLeft);

        let event = decode(r#"{"event": "game:turnEnd"}"#);
        assert_eq!(event, ServerEvent::TurnEnd);
    }

    #[test]
    fn test_game_started_accepts_start_game_alias() {
        let json = r#"{
            "event": "start_game",
            "data": {
                "players": [],
                "roles": {"p1": "encryptor", "p2": "decryptor"}
            }
        }"#;
        match decode(json) {
            ServerEvent::GameStarted {
                roles, secret_word, ..
            } => {
                assert_eq!(roles[&PlayerId::from("p1")], Role::Encryptor);
                assert_eq!(roles[&PlayerId::from("p2")], Role::Decryptor);
                // Decryptor payloads omit the word entirely.
                assert!(secret_word.is_none());
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_game_started_carries_secret_word_for_encryptor() {
        let json = r#"{
            "event": "game:started",
            "data": {
                "players": [],
                "roles": {"p1": "encryptor"},
                "secretWord": "apple"
            }
        }"#;
        match decode(json) {
            ServerEvent::GameStarted { secret_word, .. } => {
                assert_eq!(secret_word.as_deref(), Some("apple"));
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_turn_start_decodes_each_actor() {
        for (wire, actor) in [
            ("encryptor", Actor::Encryptor),
            ("ai", Actor::Ai),
            ("decryptor", Actor::Decryptor),
        ] {
            let json = format!(
                r#"{{"event": "game:turnStart", "data": {{"turn": "{wire}"}}}}"#
            );
            assert_eq!(decode(&json), ServerEvent::TurnStart { turn: actor });
        }
    }

    #[test]
    fn test_ai_guess_defaults_optional_fields() {
        let event = decode(
            r#"{"event": "game:aiGuess", "data": {"guess": "apple"}}"#,
        );
        match event {
            ServerEvent::AiGuess {
                thinking,
                guess,
                confidence,
            } => {
                assert!(thinking.is_empty());
                assert_eq!(guess, "apple");
                assert!(confidence.is_none());
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_message_history_decodes_messages() {
        let event = decode(
            r#"{
                "event": "game:messageHistory",
                "data": {"messages": [
                    {"id": "m1", "type": "encryptor", "content": "a fruit", "playerId": "p1"},
                    {"id": "m2", "type": "ai", "content": "Thinking: hm\n\nGuess: pear"}
                ]}
            }"#,
        );
        match event {
            ServerEvent::MessageHistory { messages } => {
                assert_eq!(messages.len(), 2);
                assert_eq!(messages[0].kind, Actor::Encryptor);
                assert_eq!(messages[1].kind, Actor::Ai);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_event_name_fails_to_decode() {
        // A closed union: unrecognized names are a decode error, not a
        // silently ignored frame.
        let result: Result<ServerEvent, _> =
            serde_json::from_str(r#"{"event": "game:teleport", "data": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_round_trip_preserves_event_names() {
        let event = ServerEvent::PlayerReady {
            player_id: PlayerId::from("p2"),
            ready: true,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "room:playerReady");
        assert_eq!(json["data"]["playerId"], "p2");
        let back: ServerEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
