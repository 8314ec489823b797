//! Outbound commands: everything the client can emit to the server.
//!
//! [`ClientCommand`] mirrors [`ServerEvent`](crate::ServerEvent) on the
//! other direction of the wire and shares its adjacently tagged JSON
//! shape. Constructors validate payload-level preconditions and refuse
//! to build a malformed frame; state-level preconditions (is a room
//! known, is it this player's turn) belong to the client layer, which
//! checks them before a command is ever constructed.

use serde::{Deserialize, Serialize};

use crate::{ProtocolError, RoomId};

/// A client-to-server command, one variant per wire event name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all_fields = "camelCase")]
pub enum ClientCommand {
    /// Join `room_id` under a display name.
    #[serde(rename = "join_room")]
    JoinRoom {
        room_id: RoomId,
        player_name: String,
    },

    /// Leave the current room.
    #[serde(rename = "room:leave")]
    LeaveRoom,

    /// Toggle the ready flag in the waiting room.
    #[serde(rename = "room:ready")]
    Ready { ready: bool },

    /// Request the joinable-room listing.
    #[serde(rename = "list_rooms")]
    ListRooms,

    /// Send a hint (encryptor only, on their turn).
    #[serde(rename = "game:message")]
    SendMessage { content: String },

    /// Submit a guess (decryptor only, on their turn).
    #[serde(rename = "game:guess")]
    SubmitGuess { guess: String },

    /// Propose the secret word for the round (encryptor only).
    #[serde(rename = "game:word")]
    ChooseWord { word: String },

    /// Ask the server to start the game in `room_id`.
    #[serde(rename = "start_game")]
    StartGame { room_id: RoomId },
}

impl ClientCommand {
    /// Builds a join command. The display name must not be blank.
    pub fn join_room(
        room_id: RoomId,
        player_name: &str,
    ) -> Result<Self, ProtocolError> {
        let player_name = non_blank(player_name, "player name")?;
        Ok(Self::JoinRoom {
            room_id,
            player_name,
        })
    }

    /// Builds a hint message. The content must not be blank.
    pub fn send_message(content: &str) -> Result<Self, ProtocolError> {
        Ok(Self::SendMessage {
            content: non_blank(content, "message content")?,
        })
    }

    /// Builds a guess submission. The guess must not be blank.
    pub fn submit_guess(guess: &str) -> Result<Self, ProtocolError> {
        Ok(Self::SubmitGuess {
            guess: non_blank(guess, "guess")?,
        })
    }

    /// Builds a secret-word proposal. The word must not be blank.
    pub fn choose_word(word: &str) -> Result<Self, ProtocolError> {
        Ok(Self::ChooseWord {
            word: non_blank(word, "secret word")?,
        })
    }

    /// The wire event name this command serializes under.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::JoinRoom { .. } => "join_room",
            Self::LeaveRoom => "room:leave",
            Self::Ready { .. } => "room:ready",
            Self::ListRooms => "list_rooms",
            Self::SendMessage { .. } => "game:message",
            Self::SubmitGuess { .. } => "game:guess",
            Self::ChooseWord { .. } => "game:word",
            Self::StartGame { .. } => "start_game",
        }
    }
}

/// Trims `value` and rejects it when nothing remains.
fn non_blank(value: &str, what: &str) -> Result<String, ProtocolError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProtocolError::InvalidCommand(format!(
            "{what} must not be blank"
        )));
    }
    Ok(trimmed.to_owned())
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProtocolError;

    #[test]
    fn test_join_room_serializes_wire_shape() {
        let cmd =
            ClientCommand::join_room(RoomId::from("r1"), "Alice").unwrap();
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["event"], "join_room");
        assert_eq!(json["data"]["roomId"], "r1");
        assert_eq!(json["data"]["playerName"], "Alice");
    }

    #[test]
    fn test_join_room_blank_name_rejected() {
        let result = ClientCommand::join_room(RoomId::from("r1"), "   ");
        assert!(matches!(result, Err(ProtocolError::InvalidCommand(_))));
    }

    #[test]
    fn test_send_message_trims_content() {
        let cmd = ClientCommand::send_message("  a fruit  ").unwrap();
        assert_eq!(
            cmd,
            ClientCommand::SendMessage {
                content: "a fruit".into()
            }
        );
    }

    #[test]
    fn test_blank_payloads_rejected() {
        assert!(ClientCommand::send_message("").is_err());
        assert!(ClientCommand::submit_guess(" \t").is_err());
        assert!(ClientCommand::choose_word("\n").is_err());
    }

    #[test]
    fn test_ready_round_trip() {
        let cmd = ClientCommand::Ready { ready: true };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"room:ready\""));
        let back: ClientCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn test_event_names_match_wire_contract() {
        let cases: Vec<(ClientCommand, &str)> = vec![
            (
                ClientCommand::join_room(RoomId::from("r"), "n").unwrap(),
                "join_room",
            ),
            (ClientCommand::LeaveRoom, "room:leave"),
            (ClientCommand::Ready { ready: false }, "room:ready"),
            (ClientCommand::ListRooms, "list_rooms"),
            (ClientCommand::send_message("x").unwrap(), "game:message"),
            (ClientCommand::submit_guess("x").unwrap(), "game:guess"),
            (ClientCommand::choose_word("x").unwrap(), "game:word"),
            (
                ClientCommand::StartGame {
                    room_id: RoomId::from("r"),
                },
                "start_game",
            ),
        ];
        for (cmd, expected) in cases {
            assert_eq!(cmd.event_name(), expected);
            let json: serde_json::Value =
                serde_json::to_value(&cmd).unwrap();
            assert_eq!(json["event"], expected);
        }
    }
}
