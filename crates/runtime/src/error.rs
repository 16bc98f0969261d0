//! Error types for the inspector runtime.

use probe_protocol::TargetKind;
use serde_json::Value;
use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while discovering targets or talking to one.
#[derive(Debug, Error)]
pub enum Error {
	/// The listener address could not be turned into a URL.
	#[error("Invalid inspector address '{address}': {reason}")]
	InvalidAddress { address: String, reason: String },

	/// HTTP request to the discovery endpoint failed.
	#[error("Request to {url} failed: {source}")]
	Http {
		url: String,
		#[source]
		source: reqwest::Error,
	},

	/// Discovery endpoint answered with a non-success status.
	#[error("Request to {url} failed with status {status}")]
	HttpStatus { url: String, status: u16 },

	/// No target of the requested kind is listed.
	#[error("No {0} target available")]
	TargetNotFound(TargetKind),

	/// WebSocket handshake or framing error.
	#[error("WebSocket error: {0}")]
	WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

	/// Transport-level error.
	#[error("Transport error: {0}")]
	TransportError(String),

	/// Malformed or unexpected protocol traffic.
	#[error("Protocol error: {0}")]
	ProtocolError(String),

	/// The inspector answered a request with an error member.
	#[error("{message} (code {code}){}", data.as_ref().map(|d| format!(": {}", render_data(d))).unwrap_or_default())]
	Remote {
		code: i64,
		message: String,
		data: Option<Value>,
	},

	/// The session closed while a request was pending.
	#[error("Connection closed")]
	ConnectionClosed,

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Returns true if the session is gone and no further requests can succeed.
	pub fn is_connection_closed(&self) -> bool {
		matches!(
			self,
			Error::ConnectionClosed | Error::WebSocket(tokio_tungstenite::tungstenite::Error::ConnectionClosed)
		)
	}
}

/// Strings print bare; anything else prints as compact JSON.
fn render_data(data: &Value) -> String {
	match data {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn remote_error_includes_data_when_present() {
		let err = Error::Remote {
			code: -32000,
			message: "Execution context was destroyed.".into(),
			data: Some(Value::from("frame detached")),
		};
		assert_eq!(err.to_string(), "Execution context was destroyed. (code -32000): frame detached");

		let err = Error::Remote {
			code: -32601,
			message: "'Foo.bar' wasn't found".into(),
			data: None,
		};
		assert_eq!(err.to_string(), "'Foo.bar' wasn't found (code -32601)");

		let err = Error::Remote {
			code: -32000,
			message: "Internal error".into(),
			data: Some(serde_json::json!({"reason": "frame detached"})),
		};
		assert_eq!(err.to_string(), r#"Internal error (code -32000): {"reason":"frame detached"}"#);
	}

	#[test]
	fn target_not_found_names_kind() {
		assert_eq!(Error::TargetNotFound(TargetKind::Node).to_string(), "No node target available");
	}
}
