//! Wire types for the V8 inspector protocol.
//!
//! This crate contains the serde-serializable types exchanged with a debug
//! listener: the target list served over HTTP by `/json/list`, and the
//! JSON-RPC messages carried over a target's WebSocket session.
//!
//! Types in this crate are pure data. Behaviour (discovery, sessions,
//! evaluation) lives in `probe-runtime` and `probe-rs`.

pub mod message;
pub mod runtime;
pub mod target;

pub use message::*;
pub use runtime::*;
pub use target::*;
