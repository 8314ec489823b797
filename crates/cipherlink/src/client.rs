//! The high-level client: one constructed context object tying the
//! store, the connection manager, the similarity guard, and the REST
//! surface together.
//!
//! Every player intent validates locally before anything is emitted:
//! turn legality through the state crate's predicates, hint similarity
//! through the guard, and structural preconditions (a known room)
//! against the store. An illegal intent returns
//! [`ClientError::Rejected`] with a reason and sends nothing, so the
//! server never sees a doomed command. The server stays authoritative
//! on outcomes; role checks use whatever role the store currently
//! holds, which by the time a game is active is the server's
//! authoritative assignment.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use cipherlink_protocol::{ClientCommand, RoomId};
use cipherlink_state::{SessionStore, SimilarityGuard, turn};

use crate::ClientError;
use crate::config::ClientConfig;
use crate::connection::{ConnectionManager, SharedStore};
use crate::rest;

/// A connected (or connectable) game client.
///
/// Construct with [`DuelClient::new`], tear down with
/// [`DuelClient::disconnect`]. No globals: everything the client needs
/// lives in this object and is dropped with it.
pub struct DuelClient {
    config: ClientConfig,
    store: SharedStore,
    connection: ConnectionManager,
    guard: SimilarityGuard,
    http: reqwest::Client,
}

impl DuelClient {
    /// Creates a client with a fresh store. Nothing connects yet.
    pub fn new(config: ClientConfig) -> Self {
        let store: SharedStore =
            Arc::new(Mutex::new(SessionStore::new()));
        let connection =
            ConnectionManager::new(config.clone(), Arc::clone(&store));
        Self {
            config,
            store,
            connection,
            guard: SimilarityGuard::default(),
            http: reqwest::Client::new(),
        }
    }

    /// Replaces the similarity policy.
    #[must_use]
    pub fn with_guard(mut self, guard: SimilarityGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Handle to the session store, for reading state imperatively.
    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    /// Subscribes to store revisions; consumers re-read on change.
    pub async fn subscribe(&self) -> watch::Receiver<u64> {
        self.store.lock().await.subscribe()
    }

    // -- Connectivity -----------------------------------------------------

    /// See [`ConnectionManager::connect`].
    pub async fn connect(&self) -> Result<(), ClientError> {
        self.connection.connect().await
    }

    /// See [`ConnectionManager::disconnect`].
    pub async fn disconnect(&self) {
        self.connection.disconnect().await;
    }

    /// Whether a live transport exists right now.
    pub async fn is_connected(&self) -> bool {
        self.connection.is_connected().await
    }

    // -- REST surface -----------------------------------------------------

    /// Creates a room over REST and returns its id.
    pub async fn create_room(&self) -> Result<RoomId, ClientError> {
        rest::create_room(&self.http, &self.config.server_url).await
    }

    /// Liveness probe for diagnostics.
    pub async fn health(&self) -> Result<(), ClientError> {
        rest::health(&self.http, &self.config.server_url).await
    }

    // -- Room intents -----------------------------------------------------

    /// Joins a room under a display name.
    pub async fn join_room(
        &self,
        room_id: RoomId,
        player_name: &str,
    ) -> Result<(), ClientError> {
        let cmd = ClientCommand::join_room(room_id, player_name)?;
        self.connection.send(cmd).await
    }

    /// Creates a room over REST, then joins it.
    pub async fn create_and_join(
        &self,
        player_name: &str,
    ) -> Result<RoomId, ClientError> {
        let room_id = self.create_room().await?;
        self.join_room(room_id.clone(), player_name).await?;
        Ok(room_id)
    }

    /// Leaves the current room. Declines when no room is known, rather
    /// than emitting a command the server would have to reject.
    pub async fn leave_room(&self) -> Result<(), ClientError> {
        {
            let store = self.store.lock().await;
            if store.room().is_none() {
                return Err(ClientError::Rejected(
                    "cannot leave: no room is joined".to_owned(),
                ));
            }
        }
        self.connection.send(ClientCommand::LeaveRoom).await
    }

    /// Toggles this player's ready flag. Legal only in the waiting
    /// room.
    pub async fn set_ready(&self, ready: bool) -> Result<(), ClientError> {
        {
            let store = self.store.lock().await;
            if store.room().is_none() {
                return Err(ClientError::Rejected(
                    "cannot ready up: no room is joined".to_owned(),
                ));
            }
            if !turn::may_toggle_ready(store.game()) {
                return Err(ClientError::Rejected(
                    "ready flags can only change while waiting".to_owned(),
                ));
            }
        }
        self.connection.send(ClientCommand::Ready { ready }).await
    }

    /// Requests the joinable-room listing.
    pub async fn list_rooms(&self) -> Result<(), ClientError> {
        self.connection.send(ClientCommand::ListRooms).await
    }

    /// Asks the server to start the game. Declines unless both players
    /// are present and ready.
    pub async fn start_game(&self) -> Result<(), ClientError> {
        let room_id = {
            let store = self.store.lock().await;
            if !turn::should_start(store.room()) {
                return Err(ClientError::Rejected(
                    "both players must be present and ready".to_owned(),
                ));
            }
            match store.room() {
                Some(room) => room.id.clone(),
                None => {
                    return Err(ClientError::Rejected(
                        "no room is joined".to_owned(),
                    ));
                }
            }
        };
        self.connection
            .send(ClientCommand::StartGame { room_id })
            .await
    }

    // -- Game intents -----------------------------------------------------

    /// Sends a hint. Declines when it is not the encryptor's turn for
    /// this caller, or when the hint is too similar to the secret word
    /// (a policy block, not a failure).
    pub async fn send_hint(
        &self,
        content: &str,
    ) -> Result<(), ClientError> {
        {
            let store = self.store.lock().await;
            if !turn::may_send_hint(store.game(), store.self_role()) {
                return Err(ClientError::Rejected(
                    "it is not your turn to send a hint".to_owned(),
                ));
            }
            if let Some(secret) = &store.game().secret_word {
                if self.guard.too_similar(content, secret) {
                    return Err(ClientError::Rejected(
                        "hint is too similar to the secret word"
                            .to_owned(),
                    ));
                }
            }
        }
        let cmd = ClientCommand::send_message(content)?;
        self.connection.send(cmd).await
    }

    /// Submits a guess. Declines when it is not the decryptor's turn
    /// for this caller.
    pub async fn submit_guess(
        &self,
        guess: &str,
    ) -> Result<(), ClientError> {
        {
            let store = self.store.lock().await;
            if !turn::may_submit_guess(store.game(), store.self_role())
            {
                return Err(ClientError::Rejected(
                    "it is not your turn to guess".to_owned(),
                ));
            }
        }
        let cmd = ClientCommand::submit_guess(guess)?;
        self.connection.send(cmd).await
    }

    /// Proposes the round's secret word. Encryptor only, while a game
    /// is active.
    pub async fn choose_word(
        &self,
        word: &str,
    ) -> Result<(), ClientError> {
        {
            let store = self.store.lock().await;
            let is_encryptor = store.self_role()
                == Some(cipherlink_protocol::Role::Encryptor);
            if !store.game().status.is_active() || !is_encryptor {
                return Err(ClientError::Rejected(
                    "only the encryptor can choose the word during a game"
                        .to_owned(),
                ));
            }
        }
        let cmd = ClientCommand::choose_word(word)?;
        self.connection.send(cmd).await
    }
}
