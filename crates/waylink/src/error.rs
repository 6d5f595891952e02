//! The error taxonomy callers see at the dispatch boundary.

use waylink_protocol::ProtocolError;

/// A precondition failure that stopped a dispatch before the network.
///
/// Each variant names exactly one reason: callers match on these to
/// drive UI ("please log in again" vs "account banned") rather than
/// parsing message strings. When one of these is raised, the pending
/// batch is left untouched so the caller can fix the precondition and
/// dispatch again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ApiException {
    /// Dispatch was requested with an empty batch. Queue at least one
    /// call first.
    #[error("no API methods queued for dispatch")]
    NoApiMethodsCalled,

    /// No auth gate was configured at all — the orchestrator has no
    /// notion of credentials to check. Distinct from
    /// [`ApiException::NotLoggedIn`], which means a gate exists but has
    /// never seen a login.
    #[error("no authentication configured")]
    NoAuth,

    /// The auth gate has never recorded a successful login.
    #[error("not logged in")]
    NotLoggedIn,

    /// Credentials are stale and could not be refreshed — either no
    /// refresher was supplied, the refresh itself failed, or the
    /// refreshed token was immediately stale again.
    #[error("auth token expired")]
    AuthTokenExpired,

    /// The server flagged the account as banned. Terminal.
    #[error("account banned")]
    Banned,
}

/// Everything that can go wrong on the way from `dispatch()` to a set
/// of decoded responses.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A precondition failed; nothing left the client.
    #[error("dispatch refused: {0}")]
    Api(ApiException),

    /// Building or decoding a call failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The dispatcher collaborator reported a transport-level failure.
    /// The batch was already drained; re-queue the calls to retry.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl DispatchError {
    /// The precondition failure inside this error, if that's what it is.
    pub fn as_api_exception(&self) -> Option<ApiException> {
        match self {
            DispatchError::Api(exception) => Some(*exception),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_reason() {
        assert_eq!(
            ApiException::NoApiMethodsCalled.to_string(),
            "no API methods queued for dispatch"
        );
        assert_eq!(
            DispatchError::Api(ApiException::Banned).to_string(),
            "dispatch refused: account banned"
        );
    }

    #[test]
    fn test_as_api_exception_extracts_only_api_variant() {
        let api = DispatchError::Api(ApiException::NoAuth);
        assert_eq!(api.as_api_exception(), Some(ApiException::NoAuth));

        let transport = DispatchError::Transport("socket closed".into());
        assert_eq!(transport.as_api_exception(), None);
    }
}
