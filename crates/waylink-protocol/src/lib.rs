//! Protocol-facing types for Waylink.
//!
//! This crate defines the units of work that the rest of the client
//! orchestrates:
//!
//! - **Types** ([`RequestType`], [`Intent`], [`Position`]) — the
//!   request catalog and dispatch context.
//! - **Descriptors** ([`CallDescriptor`]) — one queued API call: a
//!   request-type id, an opaque serialized payload, and a decoder for
//!   the matching response.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how payload messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while building
//!   or decoding a call.
//!
//! # Architecture
//!
//! This crate sits at the bottom of the stack. It knows nothing about
//! authentication, batching, or the network — it only describes calls.
//! The actual wire envelope (framing, signing, transmission) belongs to
//! the external dispatcher collaborator.
//!
//! ```text
//! Caller builders (CallDescriptor) → Batch → Orchestrator → Dispatcher (wire)
//! ```

mod codec;
mod descriptor;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use descriptor::{CallDescriptor, DecodedResponse, ResponseDecoder};
pub use error::{CodecError, ProtocolError};
pub use types::{Intent, Position, RequestType};
