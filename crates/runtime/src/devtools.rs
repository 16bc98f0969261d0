//! Target discovery over the listener's HTTP endpoint.

use probe_protocol::{Target, TargetKind};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Handle to a debug listener's discovery endpoint.
///
/// Construction only parses the address; requests are issued by
/// [`DevTools::list`] and [`DevTools::get`].
#[derive(Debug, Clone)]
pub struct DevTools {
	base: Url,
	client: reqwest::Client,
}

impl DevTools {
	/// Creates a handle for `address`, e.g. `http://localhost:9222` or
	/// `127.0.0.1:9229`.
	pub fn new(address: &str) -> Result<Self> {
		let base = normalize_address(address)?;
		let client = reqwest::Client::builder().no_proxy().build().map_err(|e| Error::Http {
			url: base.to_string(),
			source: e,
		})?;
		Ok(Self { base, client })
	}

	/// Lists every target in the listener's order.
	pub async fn list(&self) -> Result<Vec<Target>> {
		let url = self.endpoint("json/list")?;
		debug!(%url, "listing inspector targets");

		let response = self.client.get(url.clone()).send().await.map_err(|e| Error::Http {
			url: url.to_string(),
			source: e,
		})?;

		let status = response.status();
		if !status.is_success() {
			return Err(Error::HttpStatus {
				url: url.to_string(),
				status: status.as_u16(),
			});
		}

		let targets: Vec<Target> = response.json().await.map_err(|e| Error::Http {
			url: url.to_string(),
			source: e,
		})?;
		debug!(count = targets.len(), "listed inspector targets");
		Ok(targets)
	}

	/// Returns the first target of `kind` that accepts a debugger session.
	pub async fn get(&self, kind: TargetKind) -> Result<Target> {
		first_attachable(self.list().await?, &kind).ok_or(Error::TargetNotFound(kind))
	}

	fn endpoint(&self, path: &str) -> Result<Url> {
		self.base.join(path).map_err(|e| Error::InvalidAddress {
			address: self.base.to_string(),
			reason: e.to_string(),
		})
	}
}

/// First target of `kind` exposing a debugger URL, in listing order.
pub fn first_attachable(targets: Vec<Target>, kind: &TargetKind) -> Option<Target> {
	targets.into_iter().find(|t| &t.kind == kind && t.debugger_url().is_some())
}

/// Turns a user-supplied listener address into a base URL ending in `/`.
///
/// A missing scheme defaults to `http`; `ws`/`wss` are mapped to their HTTP
/// equivalents since discovery is plain HTTP.
fn normalize_address(address: &str) -> Result<Url> {
	let invalid = |reason: String| Error::InvalidAddress {
		address: address.to_string(),
		reason,
	};

	let trimmed = address.trim();
	if trimmed.is_empty() {
		return Err(invalid("address is empty".into()));
	}

	let with_scheme = if trimmed.contains("://") {
		trimmed.to_string()
	} else {
		format!("http://{trimmed}")
	};

	let mut url = Url::parse(&with_scheme).map_err(|e| invalid(e.to_string()))?;
	let scheme = match url.scheme() {
		"http" | "ws" => "http",
		"https" | "wss" => "https",
		other => return Err(invalid(format!("unsupported scheme '{other}'"))),
	};
	if url.scheme() != scheme {
		url.set_scheme(scheme).map_err(|_| invalid(format!("cannot use scheme '{scheme}'")))?;
	}
	if url.host_str().is_none_or(str::is_empty) {
		return Err(invalid("missing host".into()));
	}
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());
		url.set_path(&path);
	}
	url.set_query(None);
	url.set_fragment(None);
	Ok(url)
}
