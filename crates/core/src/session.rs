//! Debug sessions against a selected target.

use probe_protocol::Target;
use probe_runtime::{Connection, WebSocketTransport};
use tracing::{debug, info};

use crate::deadline::Deadline;
use crate::error::{Error, Result};

/// A live session with one target.
///
/// Call [`Session::close`] on every exit path once opened. Dropping an
/// unclosed session still tears down its I/O tasks, but skips the close
/// handshake.
pub struct Session {
	target: Target,
	connection: Connection,
}

impl Session {
	/// Opens a session against `target` within what remains of `deadline`.
	pub async fn open(target: Target, deadline: &Deadline) -> Result<Self> {
		let url = target
			.debugger_url()
			.ok_or_else(|| Error::NoDebuggerUrl {
				title: target.title.clone(),
			})?
			.to_string();

		debug!(%url, remaining_ms = deadline.remaining().as_millis() as u64, "connecting to target");
		let parts = deadline
			.run(WebSocketTransport::connect(&url))
			.await
			.map_err(|e| Error::ConnectTimeout(e.0))?
			.map_err(|source| Error::Connection { url: url.clone(), source })?;

		info!(target_id = %target.id, %url, "session opened");
		Ok(Self {
			target,
			connection: Connection::new(parts),
		})
	}

	pub fn target(&self) -> &Target {
		&self.target
	}

	pub(crate) fn connection(&self) -> &Connection {
		&self.connection
	}

	/// Closes the session.
	pub async fn close(self) {
		self.connection.close().await;
		debug!(target_id = %self.target.id, "session closed");
	}
}
