//! Error types for the session layer.

/// Errors that can occur at the session/auth boundary.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The refresh collaborator could not produce a new credential —
    /// network trouble, revoked refresh grant, provider outage. The
    /// message is whatever detail the collaborator could give.
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    /// The login collaborator rejected the account's credentials
    /// outright; a refresh will not help and the caller must
    /// re-authenticate interactively.
    #[error("credentials rejected: {0}")]
    CredentialsRejected(String),
}
