//! Printing of command results.
//!
//! stdout carries only the payload; diagnostics and errors go to stderr.


use std::io::Write;

use probe::{EmbeddedScript, Target};
use serde::Serialize;

use crate::error::{CliError, Result};

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text
	#[default]
	Text,
	/// One JSON document per invocation
	Json,
}

#[derive(Debug, Serialize)]
struct EvaluationRecord<'a> {
	target: &'a Target,
	value: &'a str,
}

#[derive(Debug, Serialize)]
struct ScriptRecord<'a> {
	path: &'a str,
	bytes: usize,
}

/// Writes the target table, in listener order and unfiltered.
pub fn write_targets<W: Write>(out: &mut W, targets: &[Target], format: OutputFormat) -> Result<()> {
	match format {
		OutputFormat::Text => {
			writeln!(out, "Available targets:")?;
			for (i, target) in targets.iter().enumerate() {
				writeln!(out, "  [{i}] {} ({})", target.title, target.kind)?;
				writeln!(out, "      URL: {}", target.url)?;
			}
		}
		OutputFormat::Json => {
			serde_json::to_writer(&mut *out, targets)?;
			writeln!(out)?;
		}
	}
	Ok(())
}

/// Writes the evaluated value. Text mode prints it as the sole line.
pub fn write_value<W: Write>(out: &mut W, target: &Target, value: &str, format: OutputFormat) -> Result<()> {
	match format {
		OutputFormat::Text => writeln!(out, "{value}")?,
		OutputFormat::Json => {
			serde_json::to_writer(&mut *out, &EvaluationRecord { target, value })?;
			writeln!(out)?;
		}
	}
	Ok(())
}

pub fn write_scripts<W: Write>(out: &mut W, scripts: &[EmbeddedScript], format: OutputFormat) -> Result<()> {
	match format {
		OutputFormat::Text => {
			for script in scripts {
				writeln!(out, "{}", script.path)?;
			}
		}
		OutputFormat::Json => {
			let records: Vec<_> = scripts
				.iter()
				.map(|s| ScriptRecord {
					path: s.path,
					bytes: s.body.len(),
				})
				.collect();
			serde_json::to_writer(&mut *out, &records)?;
			writeln!(out)?;
		}
	}
	Ok(())
}

/// Announces the selected target on stderr.
pub fn print_target_stderr(target: &Target) {
	eprintln!("Target: {} ({})", target.title, target.url);
}

/// Print an error message to stderr.
pub fn print_error_stderr(error: &CliError) {
	eprintln!("Error [{}]: {}", error.code(), error);
}
