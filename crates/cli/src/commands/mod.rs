//! Command dispatch.

use std::io::Write;

use probe::{Deadline, EMBEDDED_SCRIPTS, Session, discover, evaluate, interpret, list_targets};
use tracing::{debug, info};

use crate::cli::{Cli, Command, EvaluateOptions};
use crate::error::Result;
use crate::output::{self, OutputFormat};

/// Runs a parsed invocation, writing the payload to stdout.
pub async fn run(cli: Cli) -> Result<()> {
	let format = cli.format;
	let deadline = Deadline::after(cli.setup_timeout());
	let command = cli.into_command()?;

	let mut out = std::io::stdout();
	dispatch(command, &deadline, format, &mut out).await?;
	out.flush()?;
	Ok(())
}

pub async fn dispatch<W: Write>(command: Command, deadline: &Deadline, format: OutputFormat, out: &mut W) -> Result<()> {
	match command {
		Command::Scripts => output::write_scripts(out, EMBEDDED_SCRIPTS, format),
		Command::List { address } => {
			let devtools = probe::devtools(&address)?;
			let targets = list_targets(&devtools, deadline).await?;
			debug!(count = targets.len(), "listed targets");
			output::write_targets(out, &targets, format)
		}
		Command::Evaluate(options) => evaluate_command(options, deadline, format, out).await,
	}
}

async fn evaluate_command<W: Write>(options: EvaluateOptions, deadline: &Deadline, format: OutputFormat, out: &mut W) -> Result<()> {
	let code = options.source.resolve()?;
	let devtools = probe::devtools(&options.address)?;

	let target = discover(&devtools, &options.selection, deadline).await?;
	info!(target_id = %target.id, kind = %target.kind, "selected target");
	output::print_target_stderr(&target);

	let session = Session::open(target, deadline).await?;
	let outcome = evaluate(&session, &code, options.eval_timeout).await;
	let target = session.target().clone();
	session.close().await;

	let value = interpret(outcome?)?;
	output::write_value(out, &target, &value, format)
}
