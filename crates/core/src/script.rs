//! Resolution of the code text submitted for evaluation.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// A script bundled into the binary at build time.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedScript {
	/// Lookup key, relative to the crate root (e.g. `scripts/page_info.js`).
	pub path: &'static str,
	pub body: &'static str,
}

/// Scripts shipped with the binary. Looked up before the filesystem.
pub const EMBEDDED_SCRIPTS: &[EmbeddedScript] = &[
	EmbeddedScript {
		path: "scripts/electron_windows.js",
		body: include_str!("../scripts/electron_windows.js"),
	},
	EmbeddedScript {
		path: "scripts/page_info.js",
		body: include_str!("../scripts/page_info.js"),
	},
	EmbeddedScript {
		path: "scripts/process_info.js",
		body: include_str!("../scripts/process_info.js"),
	},
];

/// Returns the body of the embedded script at `path`, if bundled.
pub fn embedded(path: &str) -> Option<&'static str> {
	let key = path.strip_prefix("./").unwrap_or(path);
	EMBEDDED_SCRIPTS.iter().find(|s| s.path == key).map(|s| s.body)
}

/// Where the code text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
	/// Literal code, used verbatim.
	Inline(String),
	/// Embedded script key or filesystem path.
	Path(PathBuf),
}

impl ScriptSource {
	/// Picks the source from the two flags. An inline expression wins.
	pub fn from_flags(eval: Option<String>, script: Option<PathBuf>) -> Option<Self> {
		match (eval.filter(|e| !e.is_empty()), script.filter(|p| !p.as_os_str().is_empty())) {
			(Some(code), _) => Some(ScriptSource::Inline(code)),
			(None, Some(path)) => Some(ScriptSource::Path(path)),
			(None, None) => None,
		}
	}

	/// Produces the code text.
	pub fn resolve(&self) -> Result<String> {
		match self {
			ScriptSource::Inline(code) => Ok(code.clone()),
			ScriptSource::Path(path) => read_script(path),
		}
	}
}

fn read_script(path: &Path) -> Result<String> {
	if let Some(body) = path.to_str().and_then(embedded) {
		debug!(path = %path.display(), "using embedded script");
		return Ok(body.to_string());
	}

	let bytes = std::fs::read(path).map_err(|source| Error::ResourceNotFound {
		path: path.to_path_buf(),
		source,
	})?;
	debug!(path = %path.display(), bytes = bytes.len(), "read script from disk");
	Ok(String::from_utf8_lossy(&bytes).into_owned())
}
