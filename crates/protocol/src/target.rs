//! Target descriptors served by the debug listener's `/json/list` endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of an inspectable target.
///
/// Node and Electron main processes report `node`; browser documents report
/// `page`. Everything else (service workers, iframes, webviews, ...) is kept
/// verbatim as [`TargetKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetKind {
	Node,
	Page,
	Other(String),
}

impl TargetKind {
	pub fn as_str(&self) -> &str {
		match self {
			TargetKind::Node => "node",
			TargetKind::Page => "page",
			TargetKind::Other(kind) => kind,
		}
	}
}

impl From<String> for TargetKind {
	fn from(kind: String) -> Self {
		match kind.as_str() {
			"node" => TargetKind::Node,
			"page" => TargetKind::Page,
			_ => TargetKind::Other(kind),
		}
	}
}

impl From<TargetKind> for String {
	fn from(kind: TargetKind) -> Self {
		match kind {
			TargetKind::Other(kind) => kind,
			known => known.as_str().to_string(),
		}
	}
}

impl fmt::Display for TargetKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One inspectable execution context.
///
/// Snapshots are read-only; the listener is the source of truth and a fresh
/// list is fetched per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
	pub id: String,
	#[serde(default)]
	pub title: String,
	#[serde(rename = "type")]
	pub kind: TargetKind,
	#[serde(default)]
	pub url: String,
	/// Session endpoint. Chromium omits it while another client is attached.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub web_socket_debugger_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub devtools_frontend_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub favicon_url: Option<String>,
}

impl Target {
	/// Returns the session endpoint if the target currently exposes one.
	pub fn debugger_url(&self) -> Option<&str> {
		self.web_socket_debugger_url.as_deref().filter(|url| !url.is_empty())
	}
}
