//! Call descriptors: the unit of work the batch and orchestrator move around.
//!
//! A descriptor pairs three things: *which* call this is (the catalog
//! id), *what* it says (an already-serialized payload), and *how to
//! read the answer* (a decoder closure). Everything above this type
//! treats it as opaque — the batch orders descriptors, the orchestrator
//! gates them, the dispatcher ships them.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Codec, ProtocolError, RequestType};

/// A decoded response body, type-erased.
///
/// Each call type has its own response shape; the core doesn't know any
/// of them. Callers downcast to the concrete type they asked the
/// builder for: `body.downcast::<ProfileResponse>()`.
pub type DecodedResponse = Box<dyn Any + Send>;

/// Turns raw response bytes into a [`DecodedResponse`].
///
/// `Arc` because descriptors are cloned when a caller wants to re-queue
/// a call after a failed dispatch; the closure itself is immutable.
pub type ResponseDecoder =
    Arc<dyn Fn(&[u8]) -> Result<DecodedResponse, ProtocolError> + Send + Sync>;

/// One queued API call: catalog id + opaque payload + response decoder.
///
/// Immutable once constructed. Owned by the batch until drained, then
/// by the dispatcher for the duration of one network exchange.
#[derive(Clone)]
pub struct CallDescriptor {
    /// Which catalog entry this call is.
    pub request_type: RequestType,
    /// The serialized payload, produced by a [`Codec`]. The core never
    /// inspects these bytes.
    pub payload: Vec<u8>,
    /// Decodes the server's response bytes for this call.
    pub decoder: ResponseDecoder,
}

impl CallDescriptor {
    /// Builds a descriptor from a payload message and a typed response.
    ///
    /// The codec is cloned into the decoder closure so the response can
    /// be decoded later without threading the codec through the
    /// dispatcher. `R` is the response type the caller will downcast to.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if the payload can't be
    /// serialized.
    pub fn build<C, M, R>(
        codec: &C,
        request_type: RequestType,
        message: &M,
    ) -> Result<Self, ProtocolError>
    where
        C: Codec + Clone,
        M: Serialize,
        R: DeserializeOwned + Send + 'static,
    {
        let payload = codec.encode(message)?;
        let codec = codec.clone();
        Ok(Self {
            request_type,
            payload,
            decoder: Arc::new(move |bytes| {
                let decoded: R = codec.decode(bytes)?;
                Ok(Box::new(decoded) as DecodedResponse)
            }),
        })
    }

    /// Runs this call's decoder over response bytes.
    ///
    /// # Errors
    /// Propagates whatever the decoder reports, usually
    /// [`ProtocolError::Decode`].
    pub fn decode_response(
        &self,
        bytes: &[u8],
    ) -> Result<DecodedResponse, ProtocolError> {
        (self.decoder)(bytes)
    }
}

/// Manual impl because the decoder closure has no useful Debug form.
impl fmt::Debug for CallDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallDescriptor")
            .field("request_type", &self.request_type)
            .field("payload_len", &self.payload.len())
            .finish_non_exhaustive()
    }
}

// =========================================================================
// Tests
// =========================================================================
