//! Heuristic classification of connectivity failures.
//!
//! The transport reports failures as free-form text plus, at best, a
//! coarse error kind. Users need something better than a raw OS error,
//! so this module maps (raw message, kind hint) to an enumerated
//! category and a distinct human-readable descriptor per category.
//!
//! String matching on error text is inherently best-effort. Keeping the
//! heuristic in two pure functions isolates it: callers never branch on
//! message contents themselves, and the tables below are testable
//! without a socket in sight.

use std::fmt;

// ---------------------------------------------------------------------------
// Connection failures
// ---------------------------------------------------------------------------

/// Coarse error kind, when the transport layer knows it.
///
/// The hint takes precedence over text sniffing; `None` means "go by
/// the message alone".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorHint {
    /// An I/O-level failure (refused, unreachable, reset).
    Io,
    /// The attempt exceeded its deadline.
    Timeout,
    /// The WebSocket handshake or protocol failed.
    Handshake,
    /// No information beyond the message.
    #[default]
    None,
}

/// The enumerated categories a connection failure falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The server cannot be reached at all.
    NetworkUnreachable,
    /// The attempt timed out.
    Timeout,
    /// The browser-style cross-origin policy rejected us.
    CorsPolicy,
    /// The transport came up but the protocol handshake failed.
    Transport,
    /// Anything we cannot place.
    Generic,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NetworkUnreachable => "network-unreachable",
            Self::Timeout => "timeout",
            Self::CorsPolicy => "cors-policy",
            Self::Transport => "transport-error",
            Self::Generic => "generic",
        };
        write!(f, "{name}")
    }
}

/// Classifies a connection failure.
pub fn classify(raw: &str, hint: ErrorHint) -> ErrorCategory {
    let lower = raw.to_lowercase();

    // Explicit hints first; text sniffing only fills the gaps.
    match hint {
        ErrorHint::Timeout => return ErrorCategory::Timeout,
        ErrorHint::Io => return ErrorCategory::NetworkUnreachable,
        ErrorHint::Handshake => return ErrorCategory::Transport,
        ErrorHint::None => {}
    }

    if lower.contains("timed out") || lower.contains("timeout") {
        ErrorCategory::Timeout
    } else if lower.contains("cors") || lower.contains("cross-origin") {
        ErrorCategory::CorsPolicy
    } else if lower.contains("refused")
        || lower.contains("unreachable")
        || lower.contains("dns")
        || lower.contains("no route")
    {
        ErrorCategory::NetworkUnreachable
    } else if lower.contains("handshake")
        || lower.contains("websocket")
        || lower.contains("protocol")
    {
        ErrorCategory::Transport
    } else {
        ErrorCategory::Generic
    }
}

/// The user-facing descriptor for a connection failure.
pub fn connect_failure_message(raw: &str, hint: ErrorHint) -> String {
    match classify(raw, hint) {
        ErrorCategory::NetworkUnreachable => {
            "Cannot reach the server. Check that it is running and the \
             address is correct."
                .to_owned()
        }
        ErrorCategory::Timeout => {
            "Connection timed out. The server may be overloaded.".to_owned()
        }
        ErrorCategory::CorsPolicy => {
            "CORS policy error. Check the server's security restrictions."
                .to_owned()
        }
        ErrorCategory::Transport => {
            "WebSocket transport error. The connection failed during the \
             handshake."
                .to_owned()
        }
        ErrorCategory::Generic => format!("Connection error: {raw}"),
    }
}

/// The terminal descriptor once the retry ceiling is reached.
pub fn retry_exhausted_message(attempts: u32) -> String {
    format!(
        "Failed to connect after {attempts} attempts. Check the server \
         and try again."
    )
}

// ---------------------------------------------------------------------------
// Disconnects
// ---------------------------------------------------------------------------

/// Why an established connection went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The server closed the connection deliberately.
    Server,
    /// This client closed the connection deliberately.
    Client,
    /// The transport dropped underneath us.
    TransportLost,
    /// The reason string was not recognized.
    Unknown,
}

/// Classifies a disconnect reason string as reported by the transport.
pub fn classify_disconnect(raw: &str) -> DisconnectReason {
    match raw.trim() {
        "io server disconnect" => DisconnectReason::Server,
        "io client disconnect" => DisconnectReason::Client,
        "transport close" | "transport error" => {
            DisconnectReason::TransportLost
        }
        _ => DisconnectReason::Unknown,
    }
}

/// The user-facing descriptor for a disconnect. Unknown reasons pass
/// the raw string through rather than hiding it.
pub fn disconnect_message(raw: &str) -> String {
    match classify_disconnect(raw) {
        DisconnectReason::Server => {
            "Server disconnected. Please try reconnecting.".to_owned()
        }
        DisconnectReason::Client => {
            "Connection closed by the client.".to_owned()
        }
        DisconnectReason::TransportLost => {
            "Network connection was lost. Check your internet connection."
                .to_owned()
        }
        DisconnectReason::Unknown => format!("Disconnected: {raw}"),
    }
}

// =========================================================================
// Tests
// =========================================================================
