//! # Waylink
//!
//! Request-orchestration core for a proprietary location-game RPC
//! protocol.
//!
//! Waylink accumulates logical API calls into an ordered batch, gates
//! every dispatch on authentication state, arms each cycle with the
//! server-mandated verification probe, and computes the grid-cell cover
//! that location-scoped queries must carry. Wire encoding, request
//! signing, and the network itself live behind the [`Dispatcher`] trait
//! the integrator supplies; the initial credential exchange lives
//! behind [`TokenRefresher`](waylink_session::TokenRefresher).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use waylink::prelude::*;
//!
//! # struct MyDispatcher;
//! # impl Dispatcher for MyDispatcher {
//! #     async fn dispatch(
//! #         &self,
//! #         _envelope: DispatchEnvelope,
//! #     ) -> Result<Vec<CallResponse>, DispatchError> {
//! #         Ok(Vec::new())
//! #     }
//! # }
//! # async fn run() -> Result<(), DispatchError> {
//! let now = waylink::now_ms();
//! let mut gate = AuthGate::new(RefreshPolicy::AutoRefresh);
//! gate.log_in(AuthToken::new("token-from-login", now + 3_600_000));
//!
//! let mut api = RequestOrchestrator::new(
//!     JsonCodec,
//!     MyDispatcher,
//!     None::<NoRefresher>,
//!     Session::generate_random(now),
//!     DeviceInfo::generate_random(),
//!     OrchestratorConfig::default(),
//! );
//! api.set_auth(gate);
//! api.set_position(Position::at(40.758, -73.985));
//!
//! api.queue_app_start_sequence()?;
//! let responses = api.dispatch(Intent::AppStart).await?;
//! # Ok(())
//! # }
//! ```

pub mod calls;
mod delegate;
mod dispatcher;
mod error;
mod orchestrator;
pub mod version;

pub use delegate::ApiDelegate;
pub use dispatcher::{CallResponse, DispatchEnvelope, Dispatcher};
pub use error::{ApiException, DispatchError};
pub use orchestrator::{
    NoRefresher, OrchestratorConfig, RequestOrchestrator, now_ms,
};

/// One-stop imports for integrators.
pub mod prelude {
    pub use crate::{
        ApiDelegate, ApiException, CallResponse, DispatchEnvelope,
        DispatchError, Dispatcher, NoRefresher, OrchestratorConfig,
        RequestOrchestrator,
    };
    pub use waylink_batch::{CallBatch, ChallengeGuard};
    pub use waylink_geo::{CellId, cover};
    pub use waylink_protocol::{
        CallDescriptor, Codec, Intent, Position, RequestType,
    };
    #[cfg(feature = "json")]
    pub use waylink_protocol::JsonCodec;
    pub use waylink_session::{
        AuthGate, AuthToken, DeviceInfo, RefreshPolicy, Session,
        SessionError, TokenRefresher,
    };
}

/// The protocol crate's `json` feature, re-exposed so integrators can
/// disable the development codec from the top crate.
#[cfg(feature = "json")]
pub use waylink_protocol::JsonCodec;
