//! Error types for the protocol layer.
//!
//! Each crate in Waylink defines its own error enum, so a
//! `ProtocolError` always means a serialization or catalog problem —
//! never an auth or transport one.

/// The codec's underlying failure, boxed so every codec implementation
/// reports through the same two variants.
pub type CodecError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while building or decoding a call.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing a payload message failed.
    #[error("encode failed: {0}")]
    Encode(CodecError),

    /// Decoding a response body failed — malformed, truncated, or the
    /// wrong shape for the call's expected response type.
    #[error("decode failed: {0}")]
    Decode(CodecError),

    /// The data is structurally valid but violates catalog rules —
    /// e.g. an unknown request-type id.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
