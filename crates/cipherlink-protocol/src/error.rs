//! Error types for the protocol layer.

/// Errors that can occur while building or (de)serializing frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, a missing field, or an
    /// event name outside the closed union.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A command constructor declined to build a malformed frame,
    /// e.g. a blank display name or an empty guess.
    #[error("invalid command: {0}")]
    InvalidCommand(String),
}
