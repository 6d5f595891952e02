//! The ordered collection of pending call descriptors.

use waylink_protocol::CallDescriptor;

/// An ordered batch of pending calls awaiting one dispatch cycle.
///
/// The batch is two segments: what the caller queued, in queue order,
/// plus one slot for the guard-injected verification call. The segments
/// are concatenated deterministically at drain time instead of
/// index-mutating the caller's list — so there is never any ambiguity
/// about what "insert at position 1" means when the queue is short.
#[derive(Debug, Default)]
pub struct CallBatch {
    /// Caller-queued calls, in append order.
    queued: Vec<CallDescriptor>,
    /// The guard's verification call for this cycle, if any.
    injected: Option<CallDescriptor>,
}

impl CallBatch {
    /// An empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a caller call to the end of the queue. O(1), always
    /// succeeds, preserves order.
    pub fn append(&mut self, descriptor: CallDescriptor) {
        tracing::trace!(call = %descriptor.request_type, "queueing call");
        self.queued.push(descriptor);
    }

    /// Places the verification call for this dispatch cycle. Only the
    /// challenge guard calls this; a second injection in the same cycle
    /// replaces the first rather than stacking probes.
    pub fn inject(&mut self, descriptor: CallDescriptor) {
        self.injected = Some(descriptor);
    }

    /// Atomically takes every pending call and empties the batch.
    ///
    /// Drain order: the first caller-queued call, then the injected
    /// verification call, then the remaining caller calls in their
    /// original relative order. When nothing was injected this is just
    /// the queue; when the queue is empty the injected call goes alone.
    /// Safe to call on an empty batch (returns an empty sequence).
    pub fn drain(&mut self) -> Vec<CallDescriptor> {
        let mut calls = Vec::with_capacity(self.queued.len() + 1);
        let mut queued = std::mem::take(&mut self.queued).into_iter();
        if let Some(first) = queued.next() {
            calls.push(first);
        }
        if let Some(probe) = self.injected.take() {
            calls.push(probe);
        }
        calls.extend(queued);
        calls
    }

    /// Whether there is nothing to dispatch.
    pub fn is_empty(&self) -> bool {
        self.queued.is_empty() && self.injected.is_none()
    }

    /// Total pending calls, including an injected probe.
    pub fn len(&self) -> usize {
        self.queued.len() + usize::from(self.injected.is_some())
    }
}

// =========================================================================
// Tests
// =========================================================================
