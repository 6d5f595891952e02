//! Observer hook for dispatch lifecycle events.

use waylink_protocol::Intent;

use crate::ApiException;

/// Receives notifications about dispatch outcomes.
///
/// Object-safe on purpose: the orchestrator stores it as
/// `Arc<dyn ApiDelegate>` so UI layers, loggers, and test recorders can
/// all plug in without touching the orchestrator's generics. All
/// methods default to no-ops; implement only what you care about.
pub trait ApiDelegate: Send + Sync {
    /// A dispatch was refused before reaching the network.
    fn on_exception(&self, intent: Intent, exception: ApiException) {
        let _ = (intent, exception);
    }

    /// An envelope was handed to the dispatcher.
    fn on_dispatched(&self, intent: Intent, call_count: usize) {
        let _ = (intent, call_count);
    }
}
