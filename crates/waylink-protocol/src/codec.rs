//! Codec trait and implementations for serializing call payloads.
//!
//! A codec converts between Rust payload types and the opaque bytes a
//! [`CallDescriptor`](crate::CallDescriptor) carries. The orchestration
//! core never looks inside a payload — it only needs *some* strategy
//! for producing and consuming bytes, so the strategy is a trait.
//!
//! [`JsonCodec`] is provided for development and tests (readable, easy
//! to diff in logs). The production dispatcher typically supplies a
//! compact binary codec; nothing above this module changes when it does.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes payload values to bytes and decodes responses back.
///
/// `Send + Sync + 'static` because the codec is captured inside each
/// descriptor's response decoder and may be driven from any task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a payload value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if the value cannot be
    /// represented in this format.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes response bytes into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed,
    /// truncated, or don't match the expected shape.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Behind the `json` feature (enabled by default) so integrations that
/// bring their own binary codec can drop the dependency.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value)
            .map_err(|err| ProtocolError::Encode(err.into()))
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data)
            .map_err(|err| ProtocolError::Decode(err.into()))
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Probe {
        id: u64,
        name: String,
    }

    #[test]
    fn test_encode_then_decode_preserves_value() {
        let codec = JsonCodec;
        let probe = Probe {
            id: 7,
            name: "lighthouse".into(),
        };

        let bytes = codec.encode(&probe).unwrap();
        let back: Probe = codec.decode(&bytes).unwrap();

        assert_eq!(back, probe);
    }

    #[test]
    fn test_decode_garbage_returns_decode_error() {
        let codec = JsonCodec;

        let result: Result<Probe, _> = codec.decode(b"not json at all");

        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
