//! The dispatcher boundary: where a drained batch leaves the core.
//!
//! Everything below this trait — envelope framing, request signing,
//! hashing, the socket itself — is the integrator's concern. The core
//! hands over one self-contained [`DispatchEnvelope`] per cycle and
//! expects one decoded-or-failed answer back.

use waylink_protocol::{
    CallDescriptor, DecodedResponse, Intent, Position, RequestType,
};
use waylink_session::{AuthToken, DeviceInfo, Session};

use crate::DispatchError;

/// One dispatch cycle's worth of context, handed to the [`Dispatcher`].
///
/// The envelope is a value, not a view: it owns clones of the session
/// and device state so the dispatcher can sign and transmit on its own
/// schedule without borrowing the orchestrator.
#[derive(Debug, Clone)]
pub struct DispatchEnvelope {
    /// Why this dispatch is happening; for logging and rate shaping.
    pub intent: Intent,
    /// The drained calls, in the exact order the server must see them.
    pub calls: Vec<CallDescriptor>,
    /// Session identity (request id namespace, negotiated hashes).
    pub session: Session,
    /// The device the client claims to be.
    pub device: DeviceInfo,
    /// Player position at dispatch time.
    pub position: Position,
    /// The credential to sign with, if the gate holds one.
    pub token: Option<AuthToken>,
    /// Milliseconds since session start, launch jitter included.
    pub relative_timestamp_ms: u64,
}

/// One call's decoded answer, paired with the call type it answers.
pub struct CallResponse {
    /// Which catalog entry this response answers.
    pub request_type: RequestType,
    /// The decoded body; downcast to the type the builder promised.
    pub body: DecodedResponse,
}

impl std::fmt::Debug for CallResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallResponse")
            .field("request_type", &self.request_type)
            .finish_non_exhaustive()
    }
}

/// Transmits one envelope and returns the per-call responses.
///
/// Implementations typically run each call's
/// [`CallDescriptor::decode_response`] over the matching response bytes
/// and must preserve call order: `responses[i]` answers
/// `envelope.calls[i]`.
///
/// # Trait bounds
///
/// - `Send + Sync` — shared with whatever task owns the orchestrator.
/// - `'static` — owns its connection state for the orchestrator's
///   lifetime.
pub trait Dispatcher: Send + Sync + 'static {
    /// Performs one network exchange.
    ///
    /// # Errors
    /// [`DispatchError::Transport`] for network-level failures,
    /// [`DispatchError::Protocol`] when a response fails to decode.
    fn dispatch(
        &self,
        envelope: DispatchEnvelope,
    ) -> impl std::future::Future<Output = Result<Vec<CallResponse>, DispatchError>> + Send;
}
