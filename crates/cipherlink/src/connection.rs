//! Connection manager: owns the one live transport.
//!
//! Exactly one WebSocket exists per manager. [`ConnectionManager::connect`]
//! is idempotent (a no-op while connected or while an attempt is
//! pending), retries with the configured delay until the attempt
//! ceiling, and classifies every failure into a category-specific
//! descriptor in the session store. [`ConnectionManager::disconnect`]
//! tears the transport down and resets the store.
//!
//! ```text
//!                 ┌────────────┐  attempt ok   ┌───────────┐
//!   connect() ──▶ │ Connecting │ ────────────▶ │ Connected │
//!                 └────────────┘               └───────────┘
//!                   │       ▲                     │      │
//!        ceiling or │       │ transport lost      │      │ disconnect()
//!      disconnect() ▼       └─────────────────────┘      ▼
//!                 ┌──────┐                          store.reset()
//!                 │ Idle │ ◀───────────────────────────┘
//!                 └──────┘
//! ```
//!
//! Every transport transition is written into the store through the
//! enumerated connection changes; no business branching happens
//! anywhere else. Inbound frames decode into [`ServerEvent`]s and apply
//! through the dispatcher in arrival order, one frame fully applied
//! before the next is read.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use cipherlink_protocol::{ClientCommand, Codec, JsonCodec, ServerEvent};
use cipherlink_state::{SessionStore, StateChange};

use crate::ClientError;
use crate::classify::{
    DisconnectReason, ErrorHint, classify_disconnect,
    connect_failure_message, disconnect_message, retry_exhausted_message,
};
use crate::config::ClientConfig;
use crate::dispatch::reduce;

/// The session store as shared with the connection tasks.
pub type SharedStore = Arc<Mutex<SessionStore>>;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Counter for locally generated transport identifiers.
static NEXT_TRANSPORT_ID: AtomicU64 = AtomicU64::new(1);

/// Where the manager is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Connecting,
    Connected,
}

/// An outbound frame paired with its completion channel. The caller
/// awaits `done`, which resolves once the frame was handed to the
/// transport.
struct Outbound {
    frame: Message,
    done: oneshot::Sender<Result<(), String>>,
}

/// Handles to the live transport's tasks.
struct Active {
    writer_tx: mpsc::UnboundedSender<Outbound>,
    shutdown: watch::Sender<bool>,
}

struct Inner {
    phase: Phase,
    active: Option<Active>,
}

/// Shared context between the manager handle and its spawned tasks.
struct Ctx {
    config: ClientConfig,
    store: SharedStore,
    codec: JsonCodec,
    inner: Mutex<Inner>,
}

/// Owns the single transport and its retry machinery.
pub struct ConnectionManager {
    ctx: Arc<Ctx>,
}

impl ConnectionManager {
    /// Creates a manager bound to a store. Nothing connects yet.
    pub fn new(config: ClientConfig, store: SharedStore) -> Self {
        Self {
            ctx: Arc::new(Ctx {
                config,
                store,
                codec: JsonCodec,
                inner: Mutex::new(Inner {
                    phase: Phase::Idle,
                    active: None,
                }),
            }),
        }
    }

    /// Ensures exactly one live transport exists.
    ///
    /// A no-op while connected or while an attempt is already pending,
    /// so reconnection never races an in-flight connect. Otherwise
    /// attempts to connect, retrying up to the configured ceiling with
    /// the configured delay; each failure writes a category-specific
    /// descriptor into the store and counts the attempt.
    ///
    /// # Errors
    /// [`ClientError::ConnectFailed`] once retries are exhausted (the
    /// terminal descriptor also lands in the store), or
    /// [`ClientError::Cancelled`] if `disconnect()` abandoned the
    /// attempt.
    pub async fn connect(&self) -> Result<(), ClientError> {
        {
            let mut inner = self.ctx.inner.lock().await;
            match inner.phase {
                Phase::Connected | Phase::Connecting => {
                    tracing::debug!("connect() is a no-op, transport already pending or live");
                    return Ok(());
                }
                Phase::Idle => inner.phase = Phase::Connecting,
            }
        }
        run_attempts(Arc::clone(&self.ctx)).await
    }

    /// Tears down the transport and resets all session state.
    ///
    /// Cancels a pending connection attempt and any scheduled retry,
    /// closes the socket, and restores the store to initial values.
    pub async fn disconnect(&self) {
        let active = {
            let mut inner = self.ctx.inner.lock().await;
            inner.phase = Phase::Idle;
            inner.active.take()
        };
        if let Some(active) = active {
            // The read loop exits on the shutdown signal; dropping the
            // writer sender ends the writer task, which closes the sink.
            let _ = active.shutdown.send(true);
        }
        self.ctx.store.lock().await.reset();
        tracing::info!("disconnected, session state reset");
    }

    /// Whether a live transport exists right now.
    pub async fn is_connected(&self) -> bool {
        self.ctx.inner.lock().await.phase == Phase::Connected
    }

    /// Sends a command and resolves once it was handed to the
    /// transport.
    ///
    /// # Errors
    /// [`ClientError::NotConnected`] without a live transport,
    /// [`ClientError::Transport`] when the socket refuses the frame.
    pub async fn send(
        &self,
        command: ClientCommand,
    ) -> Result<(), ClientError> {
        let bytes = self.ctx.codec.encode(&command)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| ClientError::Transport("non-utf8 frame".into()))?;

        let writer_tx = {
            let inner = self.ctx.inner.lock().await;
            match (inner.phase, &inner.active) {
                (Phase::Connected, Some(active)) => {
                    active.writer_tx.clone()
                }
                _ => return Err(ClientError::NotConnected),
            }
        };

        tracing::debug!(event = command.event_name(), "command emitted");
        let (done_tx, done_rx) = oneshot::channel();
        writer_tx
            .send(Outbound {
                frame: Message::Text(text.into()),
                done: done_tx,
            })
            .map_err(|_| ClientError::NotConnected)?;

        match done_rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(msg)) => Err(ClientError::Transport(msg)),
            Err(_) => Err(ClientError::NotConnected),
        }
    }
}

// ---------------------------------------------------------------------------
// Attempt loop
// ---------------------------------------------------------------------------

/// Runs connection attempts until success, cancellation, or the
/// ceiling. Entered with phase already set to `Connecting`.
async fn run_attempts(ctx: Arc<Ctx>) -> Result<(), ClientError> {
    loop {
        // disconnect() flips the phase to Idle; a pending retry is
        // abandoned rather than resurrecting the session.
        if ctx.inner.lock().await.phase != Phase::Connecting {
            tracing::debug!("connection attempt cancelled");
            return Err(ClientError::Cancelled);
        }

        match try_connect_once(&ctx).await {
            Ok(()) => return Ok(()),
            Err(message) => {
                let attempts = {
                    let mut store = ctx.store.lock().await;
                    let _ = store.apply(StateChange::TransportFailed {
                        message: message.clone(),
                    });
                    store.connection().retry_attempts
                };
                tracing::warn!(attempts, error = %message, "connection attempt failed");

                let ceiling = ctx.config.max_reconnect_attempts;
                if !ctx.config.reconnection || attempts >= ceiling {
                    let terminal = if attempts >= ceiling {
                        let msg = retry_exhausted_message(attempts);
                        let mut store = ctx.store.lock().await;
                        let _ =
                            store.apply(StateChange::ConnectionErrorSet {
                                message: msg.clone(),
                            });
                        msg
                    } else {
                        message
                    };
                    set_phase(&ctx, Phase::Idle).await;
                    tracing::error!(error = %terminal, "giving up on connecting");
                    return Err(ClientError::ConnectFailed(terminal));
                }

                // Small jitter keeps two clients from retrying in
                // lockstep against a recovering server.
                let jitter = {
                    let mut rng = rand::rng();
                    Duration::from_millis(rng.random_range(0..250))
                };
                tokio::time::sleep(ctx.config.reconnect_delay + jitter)
                    .await;
            }
        }
    }
}

/// One connection attempt. On success the transport tasks are running
/// and the store reflects the new connection.
fn try_connect_once(
    ctx: &Arc<Ctx>,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<(), String>> + Send + '_>,
> {
    Box::pin(async move {
    let url = ctx.config.socket_url();
    tracing::debug!(%url, "opening transport");

    let attempt = connect_async(url.as_str());
    let ws: WsStream =
        match tokio::time::timeout(ctx.config.connect_timeout, attempt)
            .await
        {
            Ok(Ok((ws, _response))) => ws,
            Ok(Err(err)) => {
                return Err(connect_failure_message(
                    &err.to_string(),
                    hint_for(&err),
                ));
            }
            Err(_elapsed) => {
                return Err(connect_failure_message(
                    "connection attempt timed out",
                    ErrorHint::Timeout,
                ));
            }
        };

    let transport_id = format!(
        "transport-{}",
        NEXT_TRANSPORT_ID.fetch_add(1, Ordering::Relaxed)
    );

    let (sink, stream) = ws.split();
    let (writer_tx, writer_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Record the connection before the read loop starts, so the first
    // inbound frame can never outrun the connected transition.
    {
        let mut inner = ctx.inner.lock().await;
        inner.phase = Phase::Connected;
        inner.active = Some(Active {
            writer_tx,
            shutdown: shutdown_tx,
        });
    }
    {
        let mut store = ctx.store.lock().await;
        let _ = store.apply(StateChange::TransportConnected {
            transport_id: transport_id.clone(),
        });
    }

    tokio::spawn(writer_loop(sink, writer_rx));
    tokio::spawn(read_loop(Arc::clone(ctx), stream, shutdown_rx));

    tracing::info!(%transport_id, "connected");
    Ok(())
    })
}

async fn set_phase(ctx: &Ctx, phase: Phase) {
    ctx.inner.lock().await.phase = phase;
}

/// Maps a handshake error to its classification hint.
fn hint_for(err: &tungstenite::Error) -> ErrorHint {
    match err {
        tungstenite::Error::Io(_) => ErrorHint::Io,
        tungstenite::Error::Protocol(_)
        | tungstenite::Error::Http(_)
        | tungstenite::Error::HttpFormat(_) => ErrorHint::Handshake,
        _ => ErrorHint::None,
    }
}

// ---------------------------------------------------------------------------
// Transport tasks
// ---------------------------------------------------------------------------

/// Drains outbound frames into the sink, resolving each completion.
async fn writer_loop(
    mut sink: SplitSink<WsStream, Message>,
    mut writer_rx: mpsc::UnboundedReceiver<Outbound>,
) {
    while let Some(out) = writer_rx.recv().await {
        let result =
            sink.send(out.frame).await.map_err(|e| e.to_string());
        let failed = result.is_err();
        let _ = out.done.send(result);
        if failed {
            break;
        }
    }
    // Channel closed or send failed: close the socket politely.
    let _ = sink.close().await;
}

/// Reads frames in arrival order and applies each fully before the
/// next. Exits on shutdown (teardown owns the state) or on transport
/// loss (recorded here, with an automatic reconnect when configured).
async fn read_loop(
    ctx: Arc<Ctx>,
    mut stream: SplitStream<WsStream>,
    mut shutdown: watch::Receiver<bool>,
) {
    let reason = loop {
        tokio::select! {
            _ = shutdown.changed() => return,
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    apply_frame(&ctx, text.as_bytes()).await;
                }
                Some(Ok(Message::Binary(data))) => {
                    apply_frame(&ctx, &data).await;
                }
                Some(Ok(Message::Close(frame))) => {
                    break frame
                        .map(|f| f.reason.to_string())
                        .unwrap_or_else(|| "transport close".to_owned());
                }
                Some(Ok(_)) => {} // ping/pong
                Some(Err(err)) => {
                    tracing::debug!(error = %err, "transport receive error");
                    break "transport error".to_owned();
                }
                None => break "transport close".to_owned(),
            }
        }
    };

    let message = disconnect_message(&reason);
    tracing::warn!(%reason, "transport lost");
    {
        let mut store = ctx.store.lock().await;
        let _ = store.apply(StateChange::TransportDisconnected {
            message: Some(message),
        });
    }

    // Server-initiated disconnects stay down until the user retries;
    // a dropped transport reconnects automatically when configured.
    let auto_reconnect = ctx.config.reconnection
        && classify_disconnect(&reason) == DisconnectReason::TransportLost;
    {
        let mut inner = ctx.inner.lock().await;
        inner.active = None;
        inner.phase = if auto_reconnect {
            Phase::Connecting
        } else {
            Phase::Idle
        };
    }
    if auto_reconnect {
        tracing::info!("attempting automatic reconnect");
        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            let _ = run_attempts(ctx).await;
        });
    }
}

/// Decodes one frame and applies its changes under one store lock.
/// Undecodable frames are skipped, not fatal.
async fn apply_frame(ctx: &Ctx, data: &[u8]) {
    let event: ServerEvent = match ctx.codec.decode(data) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(error = %err, "undecodable frame, skipping");
            return;
        }
    };

    let mut store = ctx.store.lock().await;
    for change in reduce(event) {
        if let Err(err) = store.apply(change) {
            tracing::warn!(error = %err, "state change rejected");
        }
    }
}
