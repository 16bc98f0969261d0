use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure class, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Bad input detected before any I/O.
	Configuration,
	/// Script path found in neither the embedded set nor the filesystem.
	ResourceNotFound,
	/// Listing failed or no target satisfied the selection.
	Discovery,
	/// Session could not be opened.
	Connection,
	/// The evaluate round trip failed below the script level.
	EvalTransport,
	/// The submitted code threw inside the runtime.
	ScriptException,
}

#[derive(Debug, Error)]
pub enum Error {
	#[error("{0}")]
	Configuration(String),

	#[error("unknown target type: {0} (expected node, page, or auto)")]
	UnknownTargetType(String),

	#[error("failed to read script {path}: {source}")]
	ResourceNotFound {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("no node target available")]
	NoRuntimeTarget,

	#[error("no page target available")]
	NoPageTarget,

	#[error("no page target matching URL filter: {0}")]
	NoMatchingPageTarget(String),

	#[error("failed to list targets: {0}")]
	Discovery(#[source] probe_runtime::Error),

	#[error("timed out after {}ms discovering targets", .0.as_millis())]
	DiscoveryTimeout(Duration),

	#[error("target '{title}' has no debugger endpoint (is another debugger attached?)")]
	NoDebuggerUrl { title: String },

	#[error("failed to connect to {url}: {source}")]
	Connection {
		url: String,
		#[source]
		source: probe_runtime::Error,
	},

	#[error("timed out after {}ms connecting to target", .0.as_millis())]
	ConnectTimeout(Duration),

	#[error("evaluation error: {0}")]
	EvalTransport(#[source] probe_runtime::Error),

	#[error("evaluation timed out after {}ms", .0.as_millis())]
	EvalTimeout(Duration),

	#[error("Exception(line {line}, col {column}): {thrown}")]
	ScriptException { line: i64, column: i64, thrown: String },
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::Configuration(_) | Error::UnknownTargetType(_) => ErrorKind::Configuration,
			Error::ResourceNotFound { .. } => ErrorKind::ResourceNotFound,
			Error::NoRuntimeTarget
			| Error::NoPageTarget
			| Error::NoMatchingPageTarget(_)
			| Error::Discovery(_)
			| Error::DiscoveryTimeout(_) => ErrorKind::Discovery,
			Error::NoDebuggerUrl { .. } | Error::Connection { .. } | Error::ConnectTimeout(_) => ErrorKind::Connection,
			Error::EvalTransport(_) | Error::EvalTimeout(_) => ErrorKind::EvalTransport,
			Error::ScriptException { .. } => ErrorKind::ScriptException,
		}
	}

	/// Maps a discovery-call failure onto the selection taxonomy.
	pub(crate) fn from_discovery(err: probe_runtime::Error) -> Self {
		use probe_protocol::TargetKind;

		match err {
			probe_runtime::Error::TargetNotFound(TargetKind::Node) => Error::NoRuntimeTarget,
			probe_runtime::Error::TargetNotFound(TargetKind::Page) => Error::NoPageTarget,
			probe_runtime::Error::InvalidAddress { .. } => Error::Configuration(err.to_string()),
			other => Error::Discovery(other),
		}
	}
}

#[cfg(test)]
mod tests {
	use probe_protocol::TargetKind;

	use super::*;

	#[test]
	fn discovery_errors_map_to_taxonomy() {
		let node = Error::from_discovery(probe_runtime::Error::TargetNotFound(TargetKind::Node));
		assert!(matches!(node, Error::NoRuntimeTarget));

		let page = Error::from_discovery(probe_runtime::Error::TargetNotFound(TargetKind::Page));
		assert!(matches!(page, Error::NoPageTarget));

		let status = Error::from_discovery(probe_runtime::Error::HttpStatus {
			url: "http://localhost:9222/json/list".into(),
			status: 404,
		});
		assert_eq!(status.kind(), ErrorKind::Discovery);
		assert!(status.to_string().contains("404"));
	}

	#[test]
	fn script_exception_names_position() {
		let err = Error::ScriptException {
			line: 3,
			column: 5,
			thrown: "ReferenceError: x is not defined".into(),
		};
		assert_eq!(err.to_string(), "Exception(line 3, col 5): ReferenceError: x is not defined");
		assert_eq!(err.kind(), ErrorKind::ScriptException);
	}

	#[test]
	fn timeouts_report_milliseconds() {
		assert_eq!(
			Error::DiscoveryTimeout(Duration::from_secs(5)).to_string(),
			"timed out after 5000ms discovering targets"
		);
		assert_eq!(Error::ConnectTimeout(Duration::from_millis(250)).kind(), ErrorKind::Connection);
	}
}
