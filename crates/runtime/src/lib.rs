//! Inspector runtime - discovery, transport, and connection
//!
//! This crate provides the low-level plumbing for talking to a V8 inspector
//! listener:
//!
//! - **Discovery**: enumerating targets over the listener's HTTP endpoint
//! - **Transport**: text frames over a WebSocket
//! - **Connection**: JSON-RPC request/response correlation
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   probe-rs   │  Target selection, evaluation
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │probe-runtime │  This crate
//! │  ┌────────┐  │
//! │  │DevTools│  │  GET /json/list
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Conn   │  │  JSON-RPC correlation
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Trans  │  │  WebSocket frames
//! │  └────────┘  │
//! └──────────────┘
//! ```

pub mod connection;
pub mod devtools;
pub mod error;
pub mod transport;

pub use connection::Connection;
pub use devtools::DevTools;
pub use error::{Error, Result};
pub use transport::{TransportParts, TransportReceiver, TransportSender, WebSocketTransport};
