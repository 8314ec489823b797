//! Client configuration.

use std::time::Duration;

/// Maximum consecutive connection attempts before giving up.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Pause between consecutive connection attempts.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(2000);

/// How long a single connection attempt may take before it counts as
/// timed out.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Configuration for a [`DuelClient`](crate::DuelClient) connection.
///
/// The only required field is the server's base HTTP url; everything
/// else has defaults matching the server's recommended transport
/// options.
///
/// ```
/// use std::time::Duration;
/// use cipherlink::ClientConfig;
///
/// let config = ClientConfig::new("http://localhost:3001")
///     .with_reconnect_delay(Duration::from_millis(500));
/// assert_eq!(config.socket_url(), "ws://localhost:3001/ws");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base HTTP url of the server, e.g. `http://localhost:3001`.
    /// Also serves the REST endpoints (`/api/rooms`, `/api/health`).
    pub server_url: String,
    /// Whether failed attempts are retried automatically.
    pub reconnection: bool,
    /// Retry ceiling; once reached, retrying stops with a terminal
    /// descriptor.
    pub max_reconnect_attempts: u32,
    /// Pause between attempts.
    pub reconnect_delay: Duration,
    /// Per-attempt connection timeout.
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration with default transport options.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            reconnection: true,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Enables or disables automatic retries.
    #[must_use]
    pub fn with_reconnection(mut self, enabled: bool) -> Self {
        self.reconnection = enabled;
        self
    }

    /// Sets the retry ceiling.
    #[must_use]
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    /// Sets the pause between attempts.
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// The WebSocket url derived from the base url: the scheme flips
    /// to `ws`/`wss` and the `/ws` path is appended.
    pub fn socket_url(&self) -> String {
        let base = self.server_url.trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            // Already a ws:// url, or schemeless; pass through.
            base.to_owned()
        };
        if ws_base.ends_with("/ws") {
            ws_base
        } else {
            format!("{ws_base}/ws")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_transport_options() {
        let config = ClientConfig::new("http://localhost:3001");
        assert!(config.reconnection);
        assert_eq!(config.max_reconnect_attempts, 3);
        assert_eq!(config.reconnect_delay, Duration::from_millis(2000));
        assert_eq!(config.connect_timeout, Duration::from_millis(10_000));
    }

    #[test]
    fn test_socket_url_flips_scheme_and_appends_path() {
        assert_eq!(
            ClientConfig::new("http://localhost:3001").socket_url(),
            "ws://localhost:3001/ws"
        );
        assert_eq!(
            ClientConfig::new("https://duel.example.com/").socket_url(),
            "wss://duel.example.com/ws"
        );
    }

    #[test]
    fn test_socket_url_passes_ws_urls_through() {
        assert_eq!(
            ClientConfig::new("ws://127.0.0.1:9000/ws").socket_url(),
            "ws://127.0.0.1:9000/ws"
        );
    }
}
