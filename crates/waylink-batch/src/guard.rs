//! The challenge guard: keeps the anti-automation probe in every batch.
//!
//! The server may demand a verification challenge at any time, and a
//! client that doesn't ask gets its calls refused. The guard therefore
//! injects a `CheckChallenge` probe into every dispatch cycle while
//! enabled, without waiting for the server to signal that one is due —
//! the probe is cheap and the protocol tolerates asking every time.
//! A stricter client could react to a server-provided challenge-required
//! flag instead; at this layer no such signal exists.

use serde::{Deserialize, Serialize};

use waylink_protocol::{CallDescriptor, Codec, ProtocolError, RequestType};

use crate::CallBatch;

/// Payload for the `CheckChallenge` probe.
#[derive(Debug, Serialize)]
struct ChallengeCheckPayload {
    debug_request: bool,
}

/// Response to the `CheckChallenge` probe: whether the server wants a
/// challenge solved, and where to solve it. Re-exported so callers can
/// downcast the decoded response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChallengeStatus {
    /// True when the account must solve a challenge before continuing.
    pub show_challenge: bool,
    /// The challenge page to present, when one is pending.
    pub challenge_url: Option<String>,
}

/// Policy object that arms each dispatch cycle with a challenge probe.
///
/// Stateless apart from the enable flag; the guard mutates nothing but
/// the batch it is applied to.
#[derive(Debug, Clone, Copy)]
pub struct ChallengeGuard {
    enabled: bool,
}

impl ChallengeGuard {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Whether the guard injects on apply.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Injects the verification probe into the batch, if enabled.
    ///
    /// Runs once per dispatch cycle, after auth admission and before
    /// the drain, so a rejected dispatch never leaves a stray probe in
    /// the caller's queue.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if the probe payload cannot be
    /// serialized; the batch is left untouched in that case.
    pub fn apply<C: Codec + Clone>(
        &self,
        codec: &C,
        batch: &mut CallBatch,
    ) -> Result<(), ProtocolError> {
        if !self.enabled {
            return Ok(());
        }
        let probe = CallDescriptor::build::<_, _, ChallengeStatus>(
            codec,
            RequestType::CheckChallenge,
            &ChallengeCheckPayload {
                debug_request: false,
            },
        )?;
        tracing::trace!("arming batch with challenge probe");
        batch.inject(probe);
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use waylink_protocol::JsonCodec;

    #[derive(Serialize)]
    struct Empty {}

    #[derive(Debug, Deserialize)]
    struct Ack {}

    fn descriptor(request_type: RequestType) -> CallDescriptor {
        CallDescriptor::build::<_, _, Ack>(&JsonCodec, request_type, &Empty {})
            .unwrap()
    }

    #[test]
    fn test_apply_enabled_injects_probe_at_position_one() {
        let mut batch = CallBatch::new();
        batch.append(descriptor(RequestType::MapScan));
        batch.append(descriptor(RequestType::GetInventory));

        ChallengeGuard::new(true).apply(&JsonCodec, &mut batch).unwrap();

        let calls = batch.drain();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].request_type, RequestType::CheckChallenge);
        // Caller calls keep their relative order around the probe.
        assert_eq!(calls[0].request_type, RequestType::MapScan);
        assert_eq!(calls[2].request_type, RequestType::GetInventory);
    }

    #[test]
    fn test_apply_disabled_leaves_batch_unchanged() {
        let mut batch = CallBatch::new();
        batch.append(descriptor(RequestType::MapScan));

        ChallengeGuard::new(false).apply(&JsonCodec, &mut batch).unwrap();

        let calls = batch.drain();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].request_type, RequestType::MapScan);
    }

    #[test]
    fn test_apply_injects_every_cycle_not_just_once() {
        // The guard is deliberately unconditional: every enabled cycle
        // carries a probe, whether or not the server asked for one.
        let guard = ChallengeGuard::new(true);
        let mut batch = CallBatch::new();

        for _ in 0..2 {
            batch.append(descriptor(RequestType::Echo));
            guard.apply(&JsonCodec, &mut batch).unwrap();
            let calls = batch.drain();
            assert_eq!(calls.len(), 2);
            assert_eq!(calls[1].request_type, RequestType::CheckChallenge);
        }
    }

    #[test]
    fn test_probe_response_decodes_to_challenge_status() {
        let mut batch = CallBatch::new();
        batch.append(descriptor(RequestType::Echo));
        ChallengeGuard::new(true).apply(&JsonCodec, &mut batch).unwrap();

        let calls = batch.drain();
        let body = calls[1]
            .decode_response(
                br#"{"show_challenge":true,"challenge_url":"https://example.test/solve"}"#,
            )
            .unwrap();
        let status = body.downcast::<ChallengeStatus>().unwrap();
        assert!(status.show_challenge);
        assert_eq!(
            status.challenge_url.as_deref(),
            Some("https://example.test/solve")
        );
    }
}
