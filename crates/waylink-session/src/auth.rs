//! The auth gate: credential state and the dispatch admission decision.
//!
//! Every dispatch cycle asks the gate one question — "may this batch go
//! out, right now?" — and gets one of three answers: proceed, refresh
//! first, or reject for a specific reason. The gate owns the token
//! exclusively; the only mutation it ever performs on its own is
//! clearing a stale token when a refresh becomes necessary, so an
//! expired credential can never be reused by accident.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AuthToken
// ---------------------------------------------------------------------------

/// An opaque credential with an expiry deadline.
///
/// Produced by the external login/refresh collaborator; owned by the
/// gate; never persisted by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    /// The credential material, opaque to this crate.
    pub value: String,
    /// Expiry deadline, milliseconds since epoch.
    pub expires_at_ms: u64,
}

impl AuthToken {
    pub fn new(value: impl Into<String>, expires_at_ms: u64) -> Self {
        Self {
            value: value.into(),
            expires_at_ms,
        }
    }

    /// Whether the token is past its deadline at the given instant.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.expires_at_ms < now_ms
    }
}

// ---------------------------------------------------------------------------
// Policy & outcomes
// ---------------------------------------------------------------------------

/// What the gate does when credentials turn out to be stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Clear the stale token and ask the caller to run a refresh, then
    /// retry the admission check.
    #[default]
    AutoRefresh,
    /// Reject immediately; the caller decides what to do.
    FailFast,
}

/// Why the gate refused a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Never authenticated in the first place. Terminal for this
    /// dispatch attempt — not recoverable by a refresh.
    NotLoggedIn,
    /// Credentials are stale and the policy (or a failed refresh)
    /// forbids recovering automatically.
    TokenExpired,
    /// Account-level hard stop. Never retryable.
    Banned,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RejectReason::NotLoggedIn => "not logged in",
            RejectReason::TokenExpired => "auth token expired",
            RejectReason::Banned => "account banned",
        };
        f.write_str(name)
    }
}

/// The gate's answer to "may this dispatch proceed?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchCheck {
    /// Credentials are good — hand the batch to the dispatcher.
    Proceed,
    /// Stale credentials were cleared; run the refresh collaborator and
    /// re-check exactly once.
    RefreshAndRetry,
    /// Refused; the reason is user-visible, not a generic failure.
    Reject(RejectReason),
}

// ---------------------------------------------------------------------------
// AuthGate
// ---------------------------------------------------------------------------

/// Mutable authentication state plus the admission policy.
///
/// `banned` and `expired` are server-asserted flags recorded by the
/// login layer; they are consulted on every dispatch attempt regardless
/// of token presence.
#[derive(Debug, Clone)]
pub struct AuthGate {
    token: Option<AuthToken>,
    logged_in: bool,
    banned: bool,
    expired: bool,
    policy: RefreshPolicy,
}

impl AuthGate {
    /// A gate in the logged-out state with the given refresh policy.
    pub fn new(policy: RefreshPolicy) -> Self {
        Self {
            token: None,
            logged_in: false,
            banned: false,
            expired: false,
            policy,
        }
    }

    /// Records a successful login with the given credential.
    pub fn log_in(&mut self, token: AuthToken) {
        self.logged_in = true;
        self.install_token(token);
        tracing::info!("auth gate: logged in");
    }

    /// Installs a fresh credential, e.g. after a refresh completes.
    ///
    /// A fresh token also resolves a server-asserted session-expired
    /// flag — the flag described the old credential.
    pub fn install_token(&mut self, token: AuthToken) {
        self.token = Some(token);
        self.expired = false;
    }

    /// The current credential, if any. The dispatcher reads this when
    /// signing the envelope.
    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    /// Records a server-asserted ban. There is no way to clear this
    /// through the gate; a banned account stays banned.
    pub fn mark_banned(&mut self) {
        self.banned = true;
        tracing::warn!("auth gate: account flagged as banned");
    }

    /// Records a server-asserted session expiry.
    pub fn mark_expired(&mut self) {
        self.expired = true;
    }

    /// Marks the gate logged out, e.g. after the login layer gives up.
    pub fn log_out(&mut self) {
        self.logged_in = false;
        self.token = None;
    }

    /// The dispatch admission decision, evaluated at `now_ms`.
    ///
    /// Checks run in a fixed order:
    /// 1. not logged in → reject (terminal, refresh can't help);
    /// 2. token present but past expiry → clear it and request a
    ///    refresh, or reject under [`RefreshPolicy::FailFast`];
    /// 3. banned → reject, independent of token state;
    /// 4. server-asserted expired flag → same refresh/reject branch as
    ///    step 2;
    /// 5. otherwise proceed.
    ///
    /// Clearing the stale token in steps 2/4 is the only mutation; the
    /// actual refresh belongs to the caller's `TokenRefresher`.
    pub fn check_dispatch_allowed(&mut self, now_ms: u64) -> DispatchCheck {
        if !self.logged_in {
            return DispatchCheck::Reject(RejectReason::NotLoggedIn);
        }

        if let Some(token) = &self.token {
            if token.is_expired(now_ms) {
                tracing::debug!(
                    expires_at_ms = token.expires_at_ms,
                    now_ms,
                    "auth token past expiry"
                );
                return self.stale_credential_outcome();
            }
        }

        if self.banned {
            return DispatchCheck::Reject(RejectReason::Banned);
        }

        if self.expired {
            return self.stale_credential_outcome();
        }

        DispatchCheck::Proceed
    }

    /// Shared refresh-or-reject branch for steps 2 and 4.
    fn stale_credential_outcome(&mut self) -> DispatchCheck {
        match self.policy {
            RefreshPolicy::AutoRefresh => {
                // The stale token must not survive to be reused.
                self.token = None;
                DispatchCheck::RefreshAndRetry
            }
            RefreshPolicy::FailFast => {
                DispatchCheck::Reject(RejectReason::TokenExpired)
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_000_000;

    // -- Helpers ----------------------------------------------------------

    /// A gate holding a token valid for ten more minutes.
    fn gate_with_valid_token(policy: RefreshPolicy) -> AuthGate {
        let mut gate = AuthGate::new(policy);
        gate.log_in(AuthToken::new("tok", NOW + 600_000));
        gate
    }

    /// A gate holding a token that expired one millisecond ago.
    fn gate_with_stale_token(policy: RefreshPolicy) -> AuthGate {
        let mut gate = AuthGate::new(policy);
        gate.log_in(AuthToken::new("tok", NOW - 1));
        gate
    }

    // =====================================================================
    // check_dispatch_allowed()
    // =====================================================================

    #[test]
    fn test_check_valid_token_proceeds() {
        let mut gate = gate_with_valid_token(RefreshPolicy::AutoRefresh);
        assert_eq!(gate.check_dispatch_allowed(NOW), DispatchCheck::Proceed);
    }

    #[test]
    fn test_check_logged_out_rejects_even_with_valid_token() {
        let mut gate = gate_with_valid_token(RefreshPolicy::AutoRefresh);
        gate.log_out();
        gate.install_token(AuthToken::new("tok", NOW + 600_000));

        assert_eq!(
            gate.check_dispatch_allowed(NOW),
            DispatchCheck::Reject(RejectReason::NotLoggedIn)
        );
    }

    #[test]
    fn test_check_stale_token_autorefresh_clears_and_requests_retry() {
        let mut gate = gate_with_stale_token(RefreshPolicy::AutoRefresh);

        let outcome = gate.check_dispatch_allowed(NOW);

        assert_eq!(outcome, DispatchCheck::RefreshAndRetry);
        assert!(gate.token().is_none(), "stale token must be cleared");
    }

    #[test]
    fn test_check_stale_token_failfast_rejects_and_keeps_token() {
        let mut gate = gate_with_stale_token(RefreshPolicy::FailFast);

        let outcome = gate.check_dispatch_allowed(NOW);

        assert_eq!(
            outcome,
            DispatchCheck::Reject(RejectReason::TokenExpired)
        );
        // FailFast never mutates; the caller may inspect the token.
        assert!(gate.token().is_some());
    }

    #[test]
    fn test_check_banned_rejects_regardless_of_token_validity() {
        let mut gate = gate_with_valid_token(RefreshPolicy::AutoRefresh);
        gate.mark_banned();

        assert_eq!(
            gate.check_dispatch_allowed(NOW),
            DispatchCheck::Reject(RejectReason::Banned)
        );
    }

    #[test]
    fn test_check_banned_takes_precedence_over_expired_flag() {
        let mut gate = gate_with_valid_token(RefreshPolicy::AutoRefresh);
        gate.mark_banned();
        gate.mark_expired();

        assert_eq!(
            gate.check_dispatch_allowed(NOW),
            DispatchCheck::Reject(RejectReason::Banned)
        );
    }

    #[test]
    fn test_check_expired_flag_autorefresh_requests_retry() {
        let mut gate = gate_with_valid_token(RefreshPolicy::AutoRefresh);
        gate.mark_expired();

        assert_eq!(
            gate.check_dispatch_allowed(NOW),
            DispatchCheck::RefreshAndRetry
        );
        assert!(gate.token().is_none());
    }

    #[test]
    fn test_check_expired_flag_failfast_rejects() {
        let mut gate = gate_with_valid_token(RefreshPolicy::FailFast);
        gate.mark_expired();

        assert_eq!(
            gate.check_dispatch_allowed(NOW),
            DispatchCheck::Reject(RejectReason::TokenExpired)
        );
    }

    #[test]
    fn test_check_no_token_but_logged_in_proceeds() {
        // A gate can be logged in while the token is still being
        // minted; token expiry only applies when a token is present.
        let mut gate = AuthGate::new(RefreshPolicy::AutoRefresh);
        gate.log_in(AuthToken::new("tok", NOW + 1));
        gate.log_out();
        gate.logged_in = true; // direct field poke is test-only

        assert_eq!(gate.check_dispatch_allowed(NOW), DispatchCheck::Proceed);
    }

    // =====================================================================
    // install_token()
    // =====================================================================

    #[test]
    fn test_install_token_clears_expired_flag() {
        let mut gate = gate_with_valid_token(RefreshPolicy::AutoRefresh);
        gate.mark_expired();
        assert_eq!(
            gate.check_dispatch_allowed(NOW),
            DispatchCheck::RefreshAndRetry
        );

        // Refresh collaborator came back with a new credential.
        gate.install_token(AuthToken::new("fresh", NOW + 600_000));

        assert_eq!(gate.check_dispatch_allowed(NOW), DispatchCheck::Proceed);
    }

    #[test]
    fn test_token_expiry_boundary_is_strict() {
        // expires_at == now is still valid; only strictly-past expires.
        let token = AuthToken::new("tok", NOW);
        assert!(!token.is_expired(NOW));
        assert!(token.is_expired(NOW + 1));
    }
}
