//! The request orchestrator: queue, gate, arm, drain, dispatch.
//!
//! One orchestrator owns one session's complete dispatch state — the
//! pending batch, the auth gate, the challenge guard, and the handles
//! to the two external collaborators (dispatcher and token refresher).
//! Every dispatch cycle runs the same fixed sequence:
//!
//! 1. refuse an empty batch;
//! 2. ask the auth gate for admission (refreshing the token at most
//!    once if the gate asks for it);
//! 3. arm the batch with the challenge probe;
//! 4. drain atomically and hand the envelope to the dispatcher.
//!
//! A refused dispatch leaves the batch exactly as queued, so the caller
//! can fix the precondition (log in, refresh, wait out a ban appeal)
//! and dispatch the same work again.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use waylink_batch::{CallBatch, ChallengeGuard};
use waylink_protocol::{CallDescriptor, Codec, Intent, Position, ProtocolError};
use waylink_session::{
    AuthGate, AuthToken, DeviceInfo, DispatchCheck, RejectReason, Session,
    SessionError, TokenRefresher,
};

use crate::{
    ApiDelegate, ApiException, CallResponse, DispatchEnvelope, DispatchError,
    Dispatcher, calls,
};

/// Current wall-clock time, milliseconds since the Unix epoch.
///
/// Pre-epoch clocks report zero rather than panicking.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Config & placeholder refresher
// ---------------------------------------------------------------------------

/// Tunable orchestrator behavior, fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorConfig {
    /// Arm every dispatch with the verification probe.
    pub check_challenge: bool,
    /// Log each drained call at debug level before dispatch.
    pub log_requests: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            check_challenge: true,
            log_requests: true,
        }
    }
}

/// A refresher that always fails, for callers with no login
/// collaborator. Name it in the turbofish when passing `None`:
/// `RequestOrchestrator::new(..., None::<NoRefresher>, ...)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRefresher;

impl TokenRefresher for NoRefresher {
    async fn refresh(&self) -> Result<AuthToken, SessionError> {
        Err(SessionError::RefreshFailed(
            "no token refresher configured".into(),
        ))
    }
}

// ---------------------------------------------------------------------------
// RequestOrchestrator
// ---------------------------------------------------------------------------

/// Owns one session's dispatch state and runs the dispatch cycle.
///
/// Generic over the codec, the dispatcher, and the token refresher so
/// the whole stack is statically dispatched; the only trait object is
/// the optional delegate, which is observational.
pub struct RequestOrchestrator<C, D, R>
where
    C: Codec + Clone,
    D: Dispatcher,
    R: TokenRefresher,
{
    codec: C,
    dispatcher: D,
    refresher: Option<R>,
    delegate: Option<Arc<dyn ApiDelegate>>,
    auth: Option<AuthGate>,
    session: Session,
    device: DeviceInfo,
    position: Position,
    batch: CallBatch,
    guard: ChallengeGuard,
    config: OrchestratorConfig,
}

impl<C, D, R> RequestOrchestrator<C, D, R>
where
    C: Codec + Clone,
    D: Dispatcher,
    R: TokenRefresher,
{
    /// A fresh orchestrator with an empty batch and no auth gate.
    ///
    /// Until [`set_auth`](Self::set_auth) installs a gate, every
    /// dispatch is refused with [`ApiException::NoAuth`].
    pub fn new(
        codec: C,
        dispatcher: D,
        refresher: Option<R>,
        session: Session,
        device: DeviceInfo,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            codec,
            dispatcher,
            refresher,
            delegate: None,
            auth: None,
            session,
            device,
            position: Position::default(),
            batch: CallBatch::new(),
            guard: ChallengeGuard::new(config.check_challenge),
            config,
        }
    }

    /// Installs the lifecycle observer.
    pub fn set_delegate(&mut self, delegate: Arc<dyn ApiDelegate>) {
        self.delegate = Some(delegate);
    }

    /// Installs the auth gate. Dispatching without one is refused with
    /// [`ApiException::NoAuth`].
    pub fn set_auth(&mut self, gate: AuthGate) {
        self.auth = Some(gate);
    }

    /// The auth gate, for recording server-asserted state (bans,
    /// session expiry) as responses come back.
    pub fn auth_mut(&mut self) -> Option<&mut AuthGate> {
        self.auth.as_mut()
    }

    /// Updates the player position carried by subsequent envelopes and
    /// used by position-scoped builders.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable session access, for writing back server-negotiated state
    /// (settings hash, fingerprint).
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    /// The codec, for building calls with the free builders directly.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    // -- Queueing -----------------------------------------------------------

    /// Appends one call to the pending batch.
    pub fn queue(&mut self, call: CallDescriptor) {
        self.batch.append(call);
    }

    /// Appends several calls, preserving their order.
    pub fn queue_all(&mut self, all: impl IntoIterator<Item = CallDescriptor>) {
        for call in all {
            self.batch.append(call);
        }
    }

    /// Pending calls awaiting the next dispatch.
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    /// Queues the keep-alive bundle: hatched eggs, inventory, badges,
    /// and a hash-gated settings download.
    ///
    /// # Errors
    /// [`ProtocolError::Encode`] if any payload fails to serialize; in
    /// that case none of the bundle is queued.
    pub fn queue_heartbeat(&mut self) -> Result<(), ProtocolError> {
        let bundle = [
            calls::get_hatched_eggs(&self.codec)?,
            calls::get_inventory(&self.codec, 0)?,
            calls::check_awarded_badges(&self.codec)?,
            calls::download_settings(&self.codec, &self.session)?,
        ];
        self.queue_all(bundle);
        Ok(())
    }

    /// Queues the post-launch burst: the player's own profile, a
    /// remote-config check for this build, then the keep-alive bundle.
    ///
    /// # Errors
    /// [`ProtocolError::Encode`] if any payload fails to serialize; in
    /// that case none of the sequence is queued.
    pub fn queue_app_start_sequence(&mut self) -> Result<(), ProtocolError> {
        let burst = [
            calls::get_player(&self.codec, "US", "en")?,
            calls::download_remote_config(&self.codec, &self.device)?,
            calls::get_hatched_eggs(&self.codec)?,
            calls::get_inventory(&self.codec, 0)?,
            calls::check_awarded_badges(&self.codec)?,
            calls::download_settings(&self.codec, &self.session)?,
        ];
        self.queue_all(burst);
        Ok(())
    }

    /// Queues a map-object scan covering the current position.
    ///
    /// # Errors
    /// [`ProtocolError::Encode`] if the payload fails to serialize.
    pub fn queue_map_scan(&mut self) -> Result<(), ProtocolError> {
        let scan = calls::map_scan(&self.codec, &self.position, None, None)?;
        self.queue(scan);
        Ok(())
    }

    // -- The dispatch cycle -------------------------------------------------

    /// Runs one full dispatch cycle for the pending batch.
    ///
    /// On success the batch is empty and the responses come back in
    /// call order (challenge probe included, when armed). On an
    /// [`ApiException`] the batch is untouched; on a transport or
    /// decode failure the batch was already drained and the caller
    /// re-queues whatever it wants retried.
    ///
    /// # Errors
    /// - [`DispatchError::Api`] — a precondition failed, see
    ///   [`ApiException`]
    /// - [`DispatchError::Protocol`] — arming or decoding failed
    /// - [`DispatchError::Transport`] — the dispatcher's exchange failed
    pub async fn dispatch(
        &mut self,
        intent: Intent,
    ) -> Result<Vec<CallResponse>, DispatchError> {
        if self.batch.is_empty() {
            return Err(self.refuse(intent, ApiException::NoApiMethodsCalled));
        }
        if self.auth.is_none() {
            return Err(self.refuse(intent, ApiException::NoAuth));
        }

        self.admit(intent).await?;

        self.guard.apply(&self.codec, &mut self.batch)?;
        let calls = self.batch.drain();

        if self.config.log_requests {
            for call in &calls {
                tracing::debug!(intent = %intent, call = %call.request_type, "request");
            }
        }

        let now = now_ms();
        let envelope = DispatchEnvelope {
            intent,
            session: self.session.clone(),
            device: self.device.clone(),
            position: self.position,
            token: self
                .auth
                .as_ref()
                .and_then(|gate| gate.token().cloned()),
            relative_timestamp_ms: self.session.elapsed_since_start(now)
                + self.session.start_jitter_ms,
            calls,
        };
        let call_count = envelope.calls.len();
        tracing::info!(intent = %intent, calls = call_count, "dispatching batch");

        let responses = self.dispatcher.dispatch(envelope).await?;
        if let Some(delegate) = &self.delegate {
            delegate.on_dispatched(intent, call_count);
        }
        Ok(responses)
    }

    /// Runs the auth admission loop: at most one refresh, then a
    /// definitive proceed-or-refuse.
    async fn admit(&mut self, intent: Intent) -> Result<(), DispatchError> {
        let mut refreshed = false;
        loop {
            // `dispatch` has already established the gate exists.
            let Some(gate) = self.auth.as_mut() else {
                return Err(self.refuse(intent, ApiException::NoAuth));
            };
            match gate.check_dispatch_allowed(now_ms()) {
                DispatchCheck::Proceed => return Ok(()),
                DispatchCheck::Reject(reason) => {
                    let exception = match reason {
                        RejectReason::NotLoggedIn => ApiException::NotLoggedIn,
                        RejectReason::TokenExpired => {
                            ApiException::AuthTokenExpired
                        }
                        RejectReason::Banned => ApiException::Banned,
                    };
                    return Err(self.refuse(intent, exception));
                }
                DispatchCheck::RefreshAndRetry => {
                    // A freshly installed token coming back stale means
                    // the refresher is handing out bad credentials;
                    // retrying again would loop forever.
                    if refreshed {
                        return Err(
                            self.refuse(intent, ApiException::AuthTokenExpired)
                        );
                    }
                    let Some(refresher) = &self.refresher else {
                        return Err(
                            self.refuse(intent, ApiException::AuthTokenExpired)
                        );
                    };
                    match refresher.refresh().await {
                        Ok(token) => {
                            if let Some(gate) = self.auth.as_mut() {
                                gate.install_token(token);
                            }
                            refreshed = true;
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "token refresh failed");
                            return Err(self.refuse(
                                intent,
                                ApiException::AuthTokenExpired,
                            ));
                        }
                    }
                }
            }
        }
    }

    /// Records a refused dispatch: logs it, notifies the delegate, and
    /// wraps the exception for the caller.
    fn refuse(&self, intent: Intent, exception: ApiException) -> DispatchError {
        tracing::warn!(intent = %intent, %exception, "dispatch refused");
        if let Some(delegate) = &self.delegate {
            delegate.on_exception(intent, exception);
        }
        DispatchError::Api(exception)
    }
}

// =========================================================================
// Tests
// =========================================================================
