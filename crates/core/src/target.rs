//! Target selection.
//!
//! Selection is a total function of (requested type, URL filter, target
//! listing). Each [`TargetType`] expands to an ordered list of [`Policy`]
//! steps; the first step that yields a target wins and the last step's error
//! is reported otherwise. The listing is reached through [`TargetSource`], so
//! the same code runs against a live listener or a fixed snapshot.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use probe_protocol::{Target, TargetKind};
use probe_runtime::DevTools;
use tracing::debug;

use crate::error::{Error, Result};

/// Requested kind of target, as given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetType {
	/// Node/Electron main-process context.
	Node,
	/// Browser document.
	Page,
	/// Node first, then page.
	#[default]
	Auto,
}

impl TargetType {
	/// Ordered policy steps for this type.
	pub fn policies(self) -> &'static [Policy] {
		match self {
			TargetType::Node => &[Policy::Node],
			TargetType::Page => &[Policy::Page],
			TargetType::Auto => &[Policy::Node, Policy::Page],
		}
	}
}

impl FromStr for TargetType {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"node" => Ok(TargetType::Node),
			"page" => Ok(TargetType::Page),
			"auto" => Ok(TargetType::Auto),
			other => Err(Error::UnknownTargetType(other.to_string())),
		}
	}
}

impl fmt::Display for TargetType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			TargetType::Node => "node",
			TargetType::Page => "page",
			TargetType::Auto => "auto",
		})
	}
}

/// One selection step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
	/// Default runtime target.
	Node,
	/// First page matching the URL filter, or the default page without one.
	Page,
}

/// Validated selection input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRequest {
	pub target_type: TargetType,
	url_filter: Option<String>,
}

impl SelectionRequest {
	pub fn new(target_type: TargetType, url_filter: Option<String>) -> Self {
		Self {
			target_type,
			url_filter: url_filter.filter(|f| !f.is_empty()),
		}
	}

	/// Parses the raw type string. Unknown types fail here, before any I/O.
	pub fn parse(target_type: &str, url_filter: Option<String>) -> Result<Self> {
		Ok(Self::new(target_type.parse()?, url_filter))
	}

	/// Non-empty URL substring filter.
	pub fn url_filter(&self) -> Option<&str> {
		self.url_filter.as_deref()
	}
}

/// Something that can enumerate targets.
pub trait TargetSource {
	/// All targets, in listing order.
	fn list(&self) -> impl Future<Output = probe_runtime::Result<Vec<Target>>> + Send;

	/// The default target of `kind`.
	fn get(&self, kind: TargetKind) -> impl Future<Output = probe_runtime::Result<Target>> + Send;
}

impl TargetSource for DevTools {
	fn list(&self) -> impl Future<Output = probe_runtime::Result<Vec<Target>>> + Send {
		DevTools::list(self)
	}

	fn get(&self, kind: TargetKind) -> impl Future<Output = probe_runtime::Result<Target>> + Send {
		DevTools::get(self, kind)
	}
}

/// A fixed listing, e.g. one already fetched for display.
impl TargetSource for [Target] {
	async fn list(&self) -> probe_runtime::Result<Vec<Target>> {
		Ok(self.to_vec())
	}

	async fn get(&self, kind: TargetKind) -> probe_runtime::Result<Target> {
		probe_runtime::devtools::first_attachable(self.to_vec(), &kind).ok_or(probe_runtime::Error::TargetNotFound(kind))
	}
}

/// First page-kind target whose URL contains `filter` (case-sensitive).
pub fn match_page<'a>(targets: &'a [Target], filter: &str) -> Option<&'a Target> {
	targets.iter().find(|t| t.kind == TargetKind::Page && t.url.contains(filter))
}

/// Selects exactly one target for `request`.
pub async fn select_target<S>(source: &S, request: &SelectionRequest) -> Result<Target>
where
	S: TargetSource + ?Sized,
{
	let mut last_error = None;
	for policy in request.target_type.policies() {
		match apply(source, *policy, request.url_filter()).await {
			Ok(target) => {
				debug!(?policy, id = %target.id, kind = %target.kind, "selected target");
				return Ok(target);
			}
			Err(e) => {
				debug!(?policy, error = %e, "selection step failed");
				last_error = Some(e);
			}
		}
	}
	// Every type expands to at least one step.
	Err(last_error.unwrap_or(Error::NoPageTarget))
}

async fn apply<S>(source: &S, policy: Policy, url_filter: Option<&str>) -> Result<Target>
where
	S: TargetSource + ?Sized,
{
	match (policy, url_filter) {
		(Policy::Node, _) => source.get(TargetKind::Node).await.map_err(Error::from_discovery),
		(Policy::Page, Some(filter)) => {
			let targets = source.list().await.map_err(Error::from_discovery)?;
			match_page(&targets, filter)
				.cloned()
				.ok_or_else(|| Error::NoMatchingPageTarget(filter.to_string()))
		}
		(Policy::Page, None) => source.get(TargetKind::Page).await.map_err(Error::from_discovery),
	}
}
