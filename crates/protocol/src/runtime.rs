//! Types from the `Runtime` protocol domain.
//!
//! See <https://chromedevtools.github.io/devtools-protocol/v8/Runtime/>

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::message::Method;

/// Parameters of `Runtime.evaluate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams {
	pub expression: String,
	/// Resolve a returned promise before replying.
	pub await_promise: bool,
	/// Evaluate as a top-level REPL statement: `let` re-declaration and
	/// top-level `await` are allowed.
	pub repl_mode: bool,
}

impl EvaluateParams {
	/// Builds parameters for `expression` with both execution flags enabled.
	pub fn new(expression: impl Into<String>) -> Self {
		Self {
			expression: expression.into(),
			await_promise: true,
			repl_mode: true,
		}
	}
}

impl Method for EvaluateParams {
	const NAME: &'static str = "Runtime.evaluate";
	type Reply = EvaluateReply;
}

/// Result of `Runtime.evaluate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateReply {
	#[serde(default)]
	pub result: RemoteObject,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exception_details: Option<ExceptionDetails>,
}

/// Mirror of a value living in the inspected runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
	#[serde(rename = "type", default)]
	pub kind: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subtype: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub class_name: Option<String>,
	/// Primitive value or JSON-serializable object. A present `null` is kept
	/// as `Some(Value::Null)` so it can be told apart from a missing value.
	#[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
	pub value: Option<Value>,
	/// `NaN`, `Infinity`, `-Infinity`, `-0` or a bigint literal such as `1n`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub unserializable_value: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub object_id: Option<String>,
}

/// Details of an exception thrown during evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
	#[serde(default)]
	pub exception_id: i64,
	#[serde(default)]
	pub text: String,
	/// Zero-based line within the evaluated script.
	#[serde(default)]
	pub line_number: i64,
	/// Zero-based column within the evaluated script.
	#[serde(default)]
	pub column_number: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub script_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exception: Option<RemoteObject>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
	D: Deserializer<'de>,
{
	Value::deserialize(deserializer).map(Some)
}
