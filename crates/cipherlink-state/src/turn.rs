//! Turn legality: pure predicates over session state.
//!
//! The turn machine never sends anything and never mutates anything;
//! it answers "would this action be legal right now, for this caller".
//! The client layer consults these predicates before building a
//! command, so an illegal action is rejected locally instead of making
//! a doomed round trip. The server stays authoritative on outcome.
//!
//! While a game is active the turn cycles
//! `encryptor → ai → decryptor → encryptor` (the agent leg may be
//! skipped when the server evaluates it internally and only reports).

use cipherlink_protocol::{Actor, Role};

use crate::model::{GameSession, GameStatus, Room};

/// May the caller send a hint right now?
///
/// Legal iff the game is active, the encryptor holds the turn, and the
/// caller is the encryptor.
pub fn may_send_hint(game: &GameSession, caller: Option<Role>) -> bool {
    game.status == GameStatus::Active
        && game.turn == Some(Actor::Encryptor)
        && caller == Some(Role::Encryptor)
}

/// May the caller submit a guess right now?
///
/// Legal iff the game is active, the decryptor holds the turn, and the
/// caller is the decryptor.
pub fn may_submit_guess(game: &GameSession, caller: Option<Role>) -> bool {
    game.status == GameStatus::Active
        && game.turn == Some(Actor::Decryptor)
        && caller == Some(Role::Decryptor)
}

/// May ready flags be toggled right now?
///
/// Legal only in the waiting room.
pub fn may_toggle_ready(game: &GameSession) -> bool {
    game.status == GameStatus::Waiting
}

/// Should the game start?
///
/// True iff exactly the full two-player complement is present and
/// everyone has toggled ready.
pub fn should_start(room: Option<&Room>) -> bool {
    room.is_some_and(|room| {
        room.occupancy() == room.capacity
            && room.players.iter().all(|p| p.ready)
    })
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cipherlink_protocol::{PlayerId, PlayerInfo, RoomId};
    use crate::model::Player;

    fn game(status: GameStatus, turn: Option<Actor>) -> GameSession {
        GameSession {
            status,
            turn,
            ..GameSession::default()
        }
    }

    fn player(id: &str, ready: bool) -> Player {
        Player::from(PlayerInfo {
            id: PlayerId::from(id),
            name: id.to_uppercase(),
            ready,
            role: None,
            session_id: None,
        })
    }

    fn room_with(players: Vec<Player>) -> Room {
        let mut room = Room::from_roster(RoomId::from("r1"), Vec::new());
        room.players = players;
        room
    }

    const STATUSES: [GameStatus; 3] =
        [GameStatus::Waiting, GameStatus::Active, GameStatus::Ended];
    const TURNS: [Option<Actor>; 4] = [
        None,
        Some(Actor::Encryptor),
        Some(Actor::Ai),
        Some(Actor::Decryptor),
    ];
    const CALLERS: [Option<Role>; 3] =
        [None, Some(Role::Encryptor), Some(Role::Decryptor)];

    #[test]
    fn test_may_send_hint_exhaustive() {
        // 3 statuses x 4 turn holders x 3 caller roles: exactly one
        // cell of the space is legal.
        for status in STATUSES {
            for turn in TURNS {
                for caller in CALLERS {
                    let expected = status == GameStatus::Active
                        && turn == Some(Actor::Encryptor)
                        && caller == Some(Role::Encryptor);
                    assert_eq!(
                        may_send_hint(&game(status, turn), caller),
                        expected,
                        "status={status:?} turn={turn:?} caller={caller:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_may_submit_guess_exhaustive() {
        for status in STATUSES {
            for turn in TURNS {
                for caller in CALLERS {
                    let expected = status == GameStatus::Active
                        && turn == Some(Actor::Decryptor)
                        && caller == Some(Role::Decryptor);
                    assert_eq!(
                        may_submit_guess(&game(status, turn), caller),
                        expected,
                        "status={status:?} turn={turn:?} caller={caller:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_may_toggle_ready_only_while_waiting() {
        assert!(may_toggle_ready(&game(GameStatus::Waiting, None)));
        assert!(!may_toggle_ready(&game(GameStatus::Active, None)));
        assert!(!may_toggle_ready(&game(GameStatus::Ended, None)));
    }

    #[test]
    fn test_should_start_needs_full_ready_room() {
        // No room at all.
        assert!(!should_start(None));

        // One player, ready.
        let room = room_with(vec![player("p1", true)]);
        assert!(!should_start(Some(&room)));

        // Two players, one not ready.
        let room = room_with(vec![player("p1", true), player("p2", false)]);
        assert!(!should_start(Some(&room)));

        // Two players, both ready.
        let room = room_with(vec![player("p1", true), player("p2", true)]);
        assert!(should_start(Some(&room)));
    }
}
