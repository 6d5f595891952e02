//! Refresh hook for obtaining fresh credentials.
//!
//! Waylink never performs the credential exchange itself — that's the
//! login collaborator's job (OAuth, a platform SDK, a test stub).
//! This crate only decides *that* a refresh is needed and calls the
//! [`TokenRefresher`] the integrator supplied.

use crate::{AuthToken, SessionError};

/// Obtains a fresh [`AuthToken`] when the gate finds the current one
/// stale.
///
/// # Trait bounds
///
/// - `Send + Sync` — the refresher is shared with the orchestrator's
///   async task and may be polled from any worker thread.
/// - `'static` — it owns its data for as long as the orchestrator lives.
///
/// # Example
///
/// ```rust
/// use waylink_session::{AuthToken, SessionError, TokenRefresher};
///
/// /// Hands out a fixed token; only useful in tests.
/// struct StaticRefresher;
///
/// impl TokenRefresher for StaticRefresher {
///     async fn refresh(&self) -> Result<AuthToken, SessionError> {
///         Ok(AuthToken::new("static-token", u64::MAX))
///     }
/// }
/// ```
pub trait TokenRefresher: Send + Sync + 'static {
    /// Performs one credential refresh.
    ///
    /// # Returns
    /// - `Ok(AuthToken)` — a fresh credential to install on the gate
    /// - `Err(SessionError::RefreshFailed)` — the exchange failed; the
    ///   orchestrator reports the dispatch as token-expired
    fn refresh(
        &self,
    ) -> impl std::future::Future<Output = Result<AuthToken, SessionError>> + Send;
}
