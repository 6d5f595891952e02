//! Call batching for Waylink.
//!
//! Between dispatches, the client accumulates call descriptors in a
//! [`CallBatch`]; at dispatch time the [`ChallengeGuard`] may add the
//! server-mandated verification probe, and the orchestrator drains the
//! whole thing in one atomic take.
//!
//! Order matters everywhere here: the server processes a request's
//! calls strictly in sequence, and the verification probe must run
//! before the calls that made it necessary.
//!
//! # Concurrency note
//!
//! A batch is NOT thread-safe and deliberately so — it is a value owned
//! by exactly one orchestrator, which takes `&mut self` for every
//! mutation. Appending from one task while another drains is ruled out
//! by the borrow checker, not by a lock.

mod batch;
mod guard;

pub use batch::CallBatch;
pub use guard::{ChallengeGuard, ChallengeStatus};
