//! Unified error type for the client crate.

use cipherlink_protocol::ProtocolError;
use cipherlink_state::StateError;

/// Top-level error for client operations.
///
/// Connectivity failures additionally land as descriptors in the
/// session store for observers to render; this type is what the
/// imperative API returns to its direct caller. Nothing here is fatal:
/// every failure is recoverable by retrying or re-initiating the
/// action.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A protocol-level error (encode, decode, invalid command).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A state-level error (illegal mutation).
    #[error(transparent)]
    State(#[from] StateError),

    /// An operation required a live transport and none exists.
    #[error("not connected")]
    NotConnected,

    /// Connecting failed; the descriptor matches what was written to
    /// the session store.
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// A pending connection attempt was abandoned by an explicit
    /// teardown.
    #[error("connection attempt cancelled")]
    Cancelled,

    /// The transport refused an outbound frame.
    #[error("transport error: {0}")]
    Transport(String),

    /// A local policy block: the action was illegal in the current
    /// state and no command was emitted. Not a failure.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The REST surface failed at the HTTP level.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The REST surface answered, but with an unsuccessful payload.
    #[error("api error: {0}")]
    Api(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err: ClientError =
            ProtocolError::InvalidCommand("blank".into()).into();
        assert!(matches!(err, ClientError::Protocol(_)));
        assert!(err.to_string().contains("blank"));
    }

    #[test]
    fn test_from_state_error() {
        let err: ClientError = StateError::NoRoom.into();
        assert!(matches!(err, ClientError::State(_)));
    }

    #[test]
    fn test_rejected_carries_reason() {
        let err = ClientError::Rejected("not your turn".into());
        assert_eq!(err.to_string(), "rejected: not your turn");
    }
}
