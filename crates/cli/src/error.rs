use probe::ErrorKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	/// Missing or conflicting command-line input.
	#[error("{0}")]
	Usage(String),

	#[error(transparent)]
	Probe(#[from] probe::Error),

	#[error("failed to write output: {0}")]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl CliError {
	/// Short machine-friendly label printed in front of the message.
	pub fn code(&self) -> &'static str {
		match self {
			CliError::Usage(_) => "USAGE",
			CliError::Probe(err) => match err.kind() {
				ErrorKind::Configuration => "CONFIGURATION",
				ErrorKind::ResourceNotFound => "RESOURCE_NOT_FOUND",
				ErrorKind::Discovery => "DISCOVERY",
				ErrorKind::Connection => "CONNECTION",
				ErrorKind::EvalTransport => "EVAL_TRANSPORT",
				ErrorKind::ScriptException => "SCRIPT_EXCEPTION",
			},
			CliError::Io(_) => "IO",
			CliError::Json(_) => "JSON",
		}
	}
}
