#![forbid(unsafe_code)]

//! Session: drive a [`dtree_core::Tree`] from a stream of backend messages.
//!
//! The backend announces a run, streams deltas for it, and reports when the
//! run ends. A [`Session`] applies the deltas in arrival order, publishes each
//! resulting tree, and sweeps away nodes left over from earlier runs once a
//! run completes.
//!
//! - [`element`]: the concrete content carried by leaves, and its append rules.
//! - [`wire`]: JSON / JSONL decoding of backend messages.
//! - [`session`]: the run state machine.
//! - [`config`]: session configuration.
//! - [`outline`]: plain-text rendering of a tree for logs and golden tests.

pub mod config;
pub mod element;
pub mod outline;
pub mod session;
pub mod wire;

#[cfg(feature = "subscriber")]
pub mod logging;

pub use config::{ConfigError, PrunePolicy, SessionConfig};
pub use element::{Element, ElementDelta, TableData};
pub use outline::outline;
pub use session::{RunOutcome, RunState, Session, SessionError};
pub use wire::{DecodeError, DecodeErrorKind, SessionMessage, decode_message, decode_stream};
