
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use probe::{ScriptSource, SelectionRequest};

use crate::error::{CliError, Result};
use crate::output::OutputFormat;

/// Evaluate JavaScript inside a running Node, Electron or Chromium process
/// through its inspector endpoint.
#[derive(Parser, Debug)]
#[command(name = "electron-probe")]
#[command(version)]
#[command(styles = cli_styles())]
#[command(after_help = "Single-dash spellings (-inspect-target, -eval, ...) are accepted as well.")]
pub struct Cli {
	/// Script file to evaluate (embedded scripts are looked up first)
	#[arg(long, value_name = "PATH", allow_hyphen_values = true)]
	pub script: Option<PathBuf>,

	/// Inline JavaScript to evaluate; takes precedence over --script
	#[arg(long, value_name = "JS", allow_hyphen_values = true)]
	pub eval: Option<String>,

	/// Inspector listener address, e.g. http://localhost:9229
	#[arg(long, value_name = "URL")]
	pub inspect_target: Option<String>,

	/// Target kind to attach to: node, page, or auto
	#[arg(long, value_name = "TYPE", default_value = "auto")]
	pub target_type: String,

	/// Only attach to a page whose URL contains this text
	#[arg(long, value_name = "TEXT")]
	pub url_filter: Option<String>,

	/// List all targets and exit
	#[arg(long)]
	pub list: bool,

	/// List the scripts bundled into this binary and exit
	#[arg(long)]
	pub scripts: bool,

	/// Budget for discovery and connect together, in milliseconds
	#[arg(long, value_name = "MS", default_value_t = 5000)]
	pub timeout_ms: u64,

	/// Bound on the evaluation round trip, in milliseconds (unbounded if unset)
	#[arg(long, value_name = "MS")]
	pub eval_timeout_ms: Option<u64>,

	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: text (default) or json
	#[arg(short = 'f', long, value_enum, default_value = "text")]
	pub format: OutputFormat,
}

/// What a validated invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	List { address: String },
	Scripts,
	Evaluate(EvaluateOptions),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluateOptions {
	pub address: String,
	pub source: ScriptSource,
	pub selection: SelectionRequest,
	pub eval_timeout: Option<Duration>,
}

impl Cli {
	/// Budget shared by discovery and connect.
	pub fn setup_timeout(&self) -> Duration {
		Duration::from_millis(self.timeout_ms)
	}

	/// Validates the flags into a [`Command`]. Performs no I/O.
	pub fn into_command(self) -> Result<Command> {
		if self.scripts {
			return Ok(Command::Scripts);
		}

		let address = self
			.inspect_target
			.filter(|a| !a.trim().is_empty())
			.ok_or_else(|| CliError::Usage("Must specify -inspect-target".into()))?;

		if self.timeout_ms == 0 {
			return Err(CliError::Usage("-timeout-ms must be greater than zero".into()));
		}

		if self.list {
			return Ok(Command::List { address });
		}

		let source = ScriptSource::from_flags(self.eval, self.script)
			.ok_or_else(|| CliError::Usage("Must specify -script or -eval".into()))?;
		let selection = SelectionRequest::parse(&self.target_type, self.url_filter)?;

		Ok(Command::Evaluate(EvaluateOptions {
			address,
			source,
			selection,
			eval_timeout: self.eval_timeout_ms.map(Duration::from_millis),
		}))
	}
}

/// Help colors: yellow headings, cyan literals.
fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Yellow.on_default().bold())
		.usage(AnsiColor::Yellow.on_default().bold())
		.literal(AnsiColor::Cyan.on_default().bold())
		.placeholder(AnsiColor::Cyan.on_default())
		.valid(AnsiColor::Green.on_default())
		.invalid(AnsiColor::Red.on_default())
}
