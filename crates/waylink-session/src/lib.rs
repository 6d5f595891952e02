//! Session identity and authentication state for Waylink.
//!
//! This crate owns everything about "who is talking to the server and
//! may they, right now":
//!
//! 1. **Session identity** — the per-client-lifetime conversation
//!    context ([`Session`]) and the device the client claims to be
//!    ([`DeviceInfo`]).
//! 2. **Auth gating** — the credential lifecycle and the dispatch
//!    admission decision ([`AuthGate`], [`AuthToken`]).
//! 3. **Refresh boundary** — the [`TokenRefresher`] trait through which
//!    an external login collaborator supplies fresh credentials. The
//!    credential exchange itself never happens here.
//!
//! # How it fits in the stack
//!
//! ```text
//! Orchestrator (above)  ← asks the gate before every dispatch
//!     ↕
//! Session layer (this crate)  ← owns token/ban/expiry state
//!     ↕
//! Login collaborator (external)  ← produces tokens on request
//! ```

mod auth;
mod error;
mod refresh;
mod session;

pub use auth::{AuthGate, AuthToken, DispatchCheck, RefreshPolicy, RejectReason};
pub use error::SessionError;
pub use refresh::TokenRefresher;
pub use session::{DeviceInfo, Platform, Session};
