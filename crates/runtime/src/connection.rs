//! JSON-RPC connection layer for inspector sessions
//!
//! This module implements request/response correlation on top of a transport.
//! It handles:
//! - Generating unique request IDs
//! - Correlating responses with pending requests
//! - Separating events (ignored) from responses
//! - Failing pending requests when the session drops
//!
//! # Message Flow
//!
//! 1. Caller invokes [`Connection::call`] or [`Connection::send_message`]
//! 2. Connection generates a unique ID and parks a oneshot sender under it
//! 3. The serialized request is handed to the writer task
//! 4. The reader task receives a response and completes the matching sender
//! 5. Caller receives the result

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use parking_lot::Mutex;
use probe_protocol::{Message, Method, Request, Response};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::transport::{TransportParts, TransportReceiver, TransportSender};

/// How long [`Connection::close`] waits for the close handshake to flush.
const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// Pending request callbacks keyed by request ID.
type CallbackMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value>>>>>;

enum Outbound {
	Text(String),
	Close,
}

/// RAII guard ensuring callback cleanup when a request future is dropped.
struct CancelGuard {
	id: u64,
	callbacks: CallbackMap,
	completed: bool,
}

impl CancelGuard {
	fn new(id: u64, callbacks: CallbackMap) -> Self {
		Self {
			id,
			callbacks,
			completed: false,
		}
	}

	fn complete(&mut self) {
		self.completed = true;
	}
}

impl Drop for CancelGuard {
	fn drop(&mut self) {
		if self.completed {
			return;
		}
		if self.callbacks.lock().remove(&self.id).is_some() {
			tracing::debug!(id = self.id, "CancelGuard: removed orphaned callback");
		}
	}
}

/// Future returned by [`Connection::send_message`] with automatic cancellation cleanup.
struct ResponseFuture {
	rx: oneshot::Receiver<Result<Value>>,
	guard: CancelGuard,
}

impl Future for ResponseFuture {
	type Output = Result<Value>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match Pin::new(&mut self.rx).poll(cx) {
			Poll::Ready(result) => {
				self.guard.complete();
				Poll::Ready(result.map_err(|_| Error::ConnectionClosed).and_then(|r| r))
			}
			Poll::Pending => Poll::Pending,
		}
	}
}

/// JSON-RPC connection to one inspector target.
///
/// Owns a writer task and a reader task. Dropping the connection aborts both;
/// [`Connection::close`] additionally performs the WebSocket close handshake.
pub struct Connection {
	last_id: AtomicU64,
	callbacks: CallbackMap,
	outbound_tx: mpsc::UnboundedSender<Outbound>,
	writer: Mutex<Option<JoinHandle<()>>>,
	reader: Mutex<Option<JoinHandle<()>>>,
}

impl Connection {
	/// Starts the connection's I/O tasks on the current tokio runtime.
	pub fn new(parts: TransportParts) -> Self {
		let TransportParts { sender, receiver } = parts;
		let callbacks: CallbackMap = Arc::new(Mutex::new(HashMap::new()));
		let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

		let writer = tokio::spawn(write_loop(sender, outbound_rx, Arc::clone(&callbacks)));
		let reader = tokio::spawn(read_loop(receiver, Arc::clone(&callbacks)));

		Self {
			last_id: AtomicU64::new(1),
			callbacks,
			outbound_tx,
			writer: Mutex::new(Some(writer)),
			reader: Mutex::new(Some(reader)),
		}
	}

	/// Sends a typed command and decodes its reply.
	pub async fn call<M: Method>(&self, params: &M) -> Result<M::Reply> {
		let params = serde_json::to_value(params)?;
		let result = self.send_message(M::NAME, params).await?;
		serde_json::from_value(result).map_err(|e| Error::ProtocolError(format!("malformed {} reply: {e}", M::NAME)))
	}

	/// Sends a raw request and awaits the `result` member of its response.
	pub async fn send_message(&self, method: &str, params: Value) -> Result<Value> {
		let id = self.last_id.fetch_add(1, Ordering::SeqCst);

		tracing::debug!(id, method, "sending request");

		let (tx, rx) = oneshot::channel();
		self.callbacks.lock().insert(id, tx);
		let guard = CancelGuard::new(id, Arc::clone(&self.callbacks));

		let request = Request {
			id,
			method: method.to_string(),
			params,
			session_id: None,
		};
		let text = serde_json::to_string(&request)?;
		tracing::trace!(%text, "request JSON");

		self.outbound_tx.send(Outbound::Text(text)).map_err(|_| Error::ConnectionClosed)?;

		ResponseFuture { rx, guard }.await
	}

	/// Closes the session, failing any requests still pending.
	pub async fn close(&self) {
		let writer = self.writer.lock().take();
		if let Some(writer) = writer {
			let _ = self.outbound_tx.send(Outbound::Close);
			if tokio::time::timeout(CLOSE_GRACE, writer).await.is_err() {
				tracing::debug!("close handshake did not finish in time");
			}
		}
		if let Some(reader) = self.reader.lock().take() {
			reader.abort();
		}
		fail_pending(&self.callbacks);
	}

	#[cfg(test)]
	fn pending_requests(&self) -> usize {
		self.callbacks.lock().len()
	}
}

impl Drop for Connection {
	fn drop(&mut self) {
		for task in [self.writer.get_mut().take(), self.reader.get_mut().take()].into_iter().flatten() {
			task.abort();
		}
	}
}

async fn write_loop(mut sender: Box<dyn TransportSender>, mut outbound_rx: mpsc::UnboundedReceiver<Outbound>, callbacks: CallbackMap) {
	while let Some(outbound) = outbound_rx.recv().await {
		match outbound {
			Outbound::Text(text) => {
				if let Err(e) = sender.send(text).await {
					tracing::warn!(error = %e, "failed to write to inspector");
					fail_pending(&callbacks);
					return;
				}
			}
			Outbound::Close => {
				if let Err(e) = sender.close().await {
					tracing::debug!(error = %e, "error while closing inspector websocket");
				}
				return;
			}
		}
	}
}

async fn read_loop(mut receiver: Box<dyn TransportReceiver>, callbacks: CallbackMap) {
	loop {
		match receiver.recv().await {
			Some(Ok(text)) => dispatch(&text, &callbacks),
			Some(Err(e)) => {
				tracing::warn!(error = %e, "failed to read from inspector");
				break;
			}
			None => {
				tracing::debug!("inspector closed the session");
				break;
			}
		}
	}
	fail_pending(&callbacks);
}

/// Routes one inbound message to its waiting request.
fn dispatch(text: &str, callbacks: &CallbackMap) {
	let message: Message = match serde_json::from_str(text) {
		Ok(message) => message,
		Err(e) => {
			tracing::warn!(error = %e, "dropping unparsable inspector message");
			return;
		}
	};

	match message {
		Message::Response(Response { id, result, error }) => {
			let Some(tx) = callbacks.lock().remove(&id) else {
				tracing::warn!(id, "response for unknown request");
				return;
			};
			let outcome = match error {
				Some(error) => Err(Error::Remote {
					code: error.code,
					message: error.message,
					data: error.data,
				}),
				None => Ok(result.unwrap_or(Value::Null)),
			};
			tracing::debug!(id, ok = outcome.is_ok(), "received response");
			let _ = tx.send(outcome);
		}
		Message::Event(event) => tracing::trace!(method = %event.method, "ignoring event"),
		Message::Unknown(value) => tracing::debug!(%value, "ignoring unknown message"),
	}
}

fn fail_pending(callbacks: &CallbackMap) {
	for (_, tx) in callbacks.lock().drain() {
		let _ = tx.send(Err(Error::ConnectionClosed));
	}
}
