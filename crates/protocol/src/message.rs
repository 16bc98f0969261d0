//! JSON-RPC envelopes carried over a target's WebSocket session.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A protocol command with a fixed method name and typed reply.
pub trait Method: Serialize {
	/// Fully qualified method name, e.g. `Runtime.evaluate`.
	const NAME: &'static str;

	/// Shape of the `result` member of a successful response.
	type Reply: DeserializeOwned;
}

/// Request sent to the inspector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
	pub id: u64,
	pub method: String,
	pub params: Value,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
}

/// Response correlated to a [`Request`] by `id`.
///
/// Exactly one of `result` and `error` is set by a conforming peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
	pub id: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<ProtocolError>,
}

/// Error member of a failed [`Response`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolError {
	pub code: i64,
	pub message: String,
	/// Free-form detail; inspectors send strings, objects, or nothing.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<Value>,
}

/// Unsolicited notification from the inspector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
	pub method: String,
	#[serde(default)]
	pub params: Value,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
}

/// Any inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
	/// Has an `id`.
	Response(Response),
	/// Has a `method` and no `id`.
	Event(Event),
	/// Forward-compatible catch-all.
	Unknown(Value),
}
