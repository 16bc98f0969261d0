//! Command-line spelling normalization.
//!
//! Flags are documented in the single-dash form (`-inspect-target URL`) that
//! existing scripts use. clap only understands double-dash long options, so
//! single-dash spellings of known long flags are rewritten before parsing.
//! Short flags (`-v`, `-vv`, `-f json`) are left alone.

use std::ffi::OsString;

use clap::CommandFactory;

use crate::cli::Cli;

/// Long option names accepted by [`Cli`], paired with whether they take a value.
fn long_flags() -> Vec<(String, bool)> {
	Cli::command()
		.get_arguments()
		.filter_map(|arg| arg.get_long().map(|long| (long.to_string(), arg.get_action().takes_values())))
		.chain([("help".to_string(), false), ("version".to_string(), false)])
		.collect()
}

/// Short options that take a value.
fn valued_shorts() -> Vec<char> {
	Cli::command()
		.get_arguments()
		.filter(|arg| arg.get_action().takes_values())
		.filter_map(|arg| arg.get_short())
		.collect()
}

/// Rewrites `-name` / `-name=value` to `--name` / `--name=value` for every
/// known long flag. Option values and everything after a bare `--` are
/// passed through.
pub fn normalize_flags<I, T>(args: I) -> Vec<OsString>
where
	I: IntoIterator<Item = T>,
	T: Into<OsString>,
{
	let longs = long_flags();
	let shorts = valued_shorts();
	let mut out = Vec::new();
	let mut passthrough = false;
	let mut value_next = false;

	for (i, arg) in args.into_iter().enumerate() {
		let arg: OsString = arg.into();
		if i == 0 || passthrough || std::mem::take(&mut value_next) {
			out.push(arg);
			continue;
		}
		if arg == "--" {
			passthrough = true;
			out.push(arg);
			continue;
		}

		let Some(text) = arg.to_str() else {
			out.push(arg);
			continue;
		};
		let (rewritten, takes_value) = rewrite(text, &longs, &shorts);
		value_next = takes_value;
		out.push(rewritten.map_or(arg, OsString::from));
	}

	out
}

/// Returns the double-dash spelling (if it changes) and whether the next
/// argument is this option's value.
fn rewrite(arg: &str, longs: &[(String, bool)], shorts: &[char]) -> (Option<String>, bool) {
	let Some(body) = arg.strip_prefix('-') else {
		return (None, false);
	};
	let (dashes, body) = match body.strip_prefix('-') {
		Some(rest) => (2, rest),
		None => (1, body),
	};
	let (name, inline_value) = match body.split_once('=') {
		Some((name, _)) => (name, true),
		None => (body, false),
	};

	if let Some((_, takes_value)) = longs.iter().find(|(long, _)| long == name) {
		let rewritten = (dashes == 1).then(|| format!("-{arg}"));
		return (rewritten, *takes_value && !inline_value);
	}

	let short_value = dashes == 1 && body.len() == 1 && body.chars().next().is_some_and(|c| shorts.contains(&c));
	(None, short_value)
}
