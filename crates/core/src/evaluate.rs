//! Remote evaluation and interpretation of its reply.

use std::time::Duration;

use probe_protocol::{EvaluateParams, EvaluateReply, ExceptionDetails, RemoteObject};
use tracing::debug;

use crate::error::{Error, Result};
use crate::session::Session;

/// Outcome of a completed `Runtime.evaluate` round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
	/// The code completed; this is its (awaited) value.
	Value(RemoteObject),
	/// The code threw.
	Exception(ExceptionDetails),
}

impl From<EvaluateReply> for Evaluation {
	fn from(reply: EvaluateReply) -> Self {
		match reply.exception_details {
			Some(details) => Evaluation::Exception(details),
			None => Evaluation::Value(reply.result),
		}
	}
}

/// Evaluates `code` in the session's target with promise awaiting and REPL
/// semantics enabled.
///
/// Performs exactly one round trip. `timeout` bounds it when set; there is no
/// retry, since re-running a script may repeat its side effects.
pub async fn evaluate(session: &Session, code: &str, timeout: Option<Duration>) -> Result<Evaluation> {
	let params = EvaluateParams::new(code);
	debug!(target_id = %session.target().id, bytes = code.len(), "evaluating");

	let call = session.connection().call(&params);
	let reply = match timeout {
		Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| Error::EvalTimeout(limit))?,
		None => call.await,
	}
	.map_err(Error::EvalTransport)?;

	Ok(reply.into())
}

/// Turns an evaluation into the single output line, or a script exception.
pub fn interpret(evaluation: Evaluation) -> Result<String> {
	match evaluation {
		Evaluation::Value(object) => Ok(render_value(&object)),
		Evaluation::Exception(details) => Err(Error::ScriptException {
			line: details.line_number,
			column: details.column_number,
			thrown: describe_exception(&details),
		}),
	}
}

/// Display text for a returned value.
///
/// JSON string values are unescaped; anything else is printed in its JSON
/// encoding. Values that do not survive JSON (`undefined`, `NaN`, bigints,
/// functions, ...) fall back to the inspector's own rendering.
pub fn render_value(object: &RemoteObject) -> String {
	if let Some(value) = &object.value {
		let raw = value.to_string();
		return unquote(&raw).unwrap_or(raw);
	}
	object
		.unserializable_value
		.clone()
		.or_else(|| object.description.clone())
		.unwrap_or_default()
}

/// Decodes a quoted, escaped string literal. `None` if `raw` is not one.
pub fn unquote(raw: &str) -> Option<String> {
	serde_json::from_str::<String>(raw).ok()
}

fn describe_exception(details: &ExceptionDetails) -> String {
	details
		.exception
		.as_ref()
		.and_then(|thrown| thrown.description.clone().or_else(|| thrown.value.as_ref().map(|_| render_value(thrown))))
		.unwrap_or_else(|| details.text.clone())
}
