//! The protocol dispatcher: inbound events to state mutations.
//!
//! [`reduce`] is the entire event table: one exhaustive match from
//! [`ServerEvent`] to the store's enumerated [`StateChange`]s. It is a
//! pure function of the event payload; it performs no I/O, starts no
//! timers, and touches no state itself. The connection manager applies
//! the returned changes under a single store lock, so a handler's
//! mutations land fully before the next event is processed.

use cipherlink_protocol::ServerEvent;
use cipherlink_state::{GameStatus, StateChange};

/// Maps one inbound event to the bounded set of changes it implies.
///
/// Ordering within the returned vector matters: for `game:started` the
/// status flips to active before roles and the secret word land, so a
/// subscriber waking on the final revision sees a fully started game.
pub fn reduce(event: ServerEvent) -> Vec<StateChange> {
    match event {
        // -- Room lifecycle --
        ServerEvent::JoinRoomSuccess {
            room_id,
            players,
            player_id,
        } => vec![
            StateChange::RoomEntered {
                room_id,
                players,
                self_id: Some(player_id),
            },
            StateChange::ErrorCleared,
        ],
        ServerEvent::RoomLeft => vec![StateChange::RoomDeparted],
        ServerEvent::PlayerJoined { player } => {
            vec![StateChange::PlayerJoined { player }]
        }
        ServerEvent::PlayerLeft { player_id } => {
            vec![StateChange::PlayerLeft { player_id }]
        }
        ServerEvent::PlayerReady { player_id, ready } => {
            vec![StateChange::PlayerReadySet { player_id, ready }]
        }
        ServerEvent::RoomList { rooms } => {
            vec![StateChange::RoomListReplaced { rooms }]
        }
        ServerEvent::RosterUpdate {
            room_id, players, ..
        } => vec![StateChange::RoomEntered {
            room_id,
            players,
            self_id: None,
        }],

        // -- Game lifecycle --
        ServerEvent::GameStarted {
            roles,
            secret_word,
            // The roster refresh is redundant with the roles overwrite;
            // membership does not change at game start.
            players: _,
        } => {
            let mut changes = vec![
                StateChange::StatusChanged {
                    status: GameStatus::Active,
                },
                StateChange::RolesAssigned { roles },
            ];
            if secret_word.is_some() {
                // Absent for the decryptor; never clobber with None.
                changes.push(StateChange::SecretWordSet {
                    word: secret_word,
                });
            }
            changes
        }
        ServerEvent::GameEnded { scores, winner: _ } => vec![
            StateChange::ScoresRecorded { scores },
            StateChange::StatusChanged {
                status: GameStatus::Ended,
            },
            StateChange::TurnChanged { turn: None },
        ],
        ServerEvent::RoundStart {
            round,
            word,
            role: _,
        } => vec![StateChange::RoundStarted { round, word }],
        ServerEvent::RoundEnd { round: _, scores } => {
            vec![StateChange::ScoresRecorded { scores }]
        }
        ServerEvent::TurnStart { turn } => {
            vec![StateChange::TurnChanged { turn: Some(turn) }]
        }
        ServerEvent::TurnEnd => vec![StateChange::TurnChanged { turn: None }],

        // -- Conversation --
        ServerEvent::Message { message } => {
            vec![StateChange::TurnAppended { message }]
        }
        ServerEvent::MessageHistory { messages } => {
            vec![StateChange::ConversationReplaced { messages }]
        }

        // -- Automated agent --
        ServerEvent::AiThinking { content } => {
            vec![StateChange::AiThoughtBuffered { content }]
        }
        ServerEvent::AiGuess {
            thinking,
            guess,
            confidence: _,
        } => vec![StateChange::AiTurnCommitted { thinking, guess }],

        // -- Application errors --
        ServerEvent::Error { message } => {
            vec![StateChange::ErrorReported { message }]
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cipherlink_protocol::{
        Actor, PlayerId, PlayerInfo, Role, RoomId, ScoreBoard,
    };
    use std::collections::HashMap;

    fn info(id: &str) -> PlayerInfo {
        PlayerInfo {
            id: PlayerId::from(id),
            name: id.to_uppercase(),
            ready: false,
            role: None,
            session_id: None,
        }
    }

    #[test]
    fn test_join_success_enters_room_and_clears_errors() {
        let changes = reduce(ServerEvent::JoinRoomSuccess {
            room_id: RoomId::from("r1"),
            players: vec![info("p1")],
            player_id: PlayerId::from("p1"),
        });
        assert!(matches!(
            changes[0],
            StateChange::RoomEntered {
                self_id: Some(_),
                ..
            }
        ));
        assert_eq!(changes[1], StateChange::ErrorCleared);
    }

    #[test]
    fn test_game_started_orders_status_before_roles() {
        let changes = reduce(ServerEvent::GameStarted {
            players: Vec::new(),
            roles: HashMap::from([(PlayerId::from("p1"), Role::Encryptor)]),
            secret_word: Some("apple".into()),
        });
        assert_eq!(
            changes[0],
            StateChange::StatusChanged {
                status: GameStatus::Active
            }
        );
        assert!(matches!(changes[1], StateChange::RolesAssigned { .. }));
        assert_eq!(
            changes[2],
            StateChange::SecretWordSet {
                word: Some("apple".into())
            }
        );
    }

    #[test]
    fn test_game_started_without_word_does_not_clobber() {
        // The decryptor's payload omits the word; no SecretWordSet
        // change may be produced for it.
        let changes = reduce(ServerEvent::GameStarted {
            players: Vec::new(),
            roles: HashMap::new(),
            secret_word: None,
        });
        assert!(
            changes
                .iter()
                .all(|c| !matches!(c, StateChange::SecretWordSet { .. }))
        );
    }

    #[test]
    fn test_game_ended_is_terminal_and_clears_turn() {
        let changes = reduce(ServerEvent::GameEnded {
            scores: ScoreBoard {
                total: 1,
                humans: 1,
                ai: 0,
            },
            winner: Some("humans".into()),
        });
        assert_eq!(
            changes,
            vec![
                StateChange::ScoresRecorded {
                    scores: ScoreBoard {
                        total: 1,
                        humans: 1,
                        ai: 0
                    }
                },
                StateChange::StatusChanged {
                    status: GameStatus::Ended
                },
                StateChange::TurnChanged { turn: None },
            ]
        );
    }

    #[test]
    fn test_turn_events_set_and_clear_holder() {
        assert_eq!(
            reduce(ServerEvent::TurnStart { turn: Actor::Ai }),
            vec![StateChange::TurnChanged {
                turn: Some(Actor::Ai)
            }]
        );
        assert_eq!(
            reduce(ServerEvent::TurnEnd),
            vec![StateChange::TurnChanged { turn: None }]
        );
    }

    #[test]
    fn test_error_event_reports_without_touching_connectivity() {
        let changes = reduce(ServerEvent::Error {
            message: "room is full".into(),
        });
        assert_eq!(
            changes,
            vec![StateChange::ErrorReported {
                message: "room is full".into()
            }]
        );
    }

    #[test]
    fn test_ai_events_buffer_then_commit() {
        assert_eq!(
            reduce(ServerEvent::AiThinking {
                content: "round".into()
            }),
            vec![StateChange::AiThoughtBuffered {
                content: "round".into()
            }]
        );
        assert_eq!(
            reduce(ServerEvent::AiGuess {
                thinking: vec!["x".into(), "y".into()],
                guess: "apple".into(),
                confidence: Some(0.8),
            }),
            vec![StateChange::AiTurnCommitted {
                thinking: vec!["x".into(), "y".into()],
                guess: "apple".into(),
            }]
        );
    }
}
