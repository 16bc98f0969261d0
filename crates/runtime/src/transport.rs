//! WebSocket transport for inspector sessions.
//!
//! Every inspector message is one JSON document in one text frame, so the
//! transport deals in whole `String` payloads. The halves are split so the
//! connection can drive reads and writes from separate tasks.

use std::future::Future;
use std::pin::Pin;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Boxed future returned by transport halves.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outbound half of a transport.
pub trait TransportSender: Send {
	/// Sends one serialized message.
	fn send(&mut self, message: String) -> TransportFuture<'_, Result<()>>;

	/// Starts an orderly shutdown of the underlying channel.
	fn close(&mut self) -> TransportFuture<'_, Result<()>>;
}

/// Inbound half of a transport.
pub trait TransportReceiver: Send {
	/// Receives the next message, or `None` once the peer has closed.
	fn recv(&mut self) -> TransportFuture<'_, Option<Result<String>>>;
}

/// Both halves of an established transport.
pub struct TransportParts {
	pub sender: Box<dyn TransportSender>,
	pub receiver: Box<dyn TransportReceiver>,
}

/// WebSocket transport constructor.
pub struct WebSocketTransport;

impl WebSocketTransport {
	/// Performs the WebSocket handshake against a target's debugger URL.
	pub async fn connect(url: &str) -> Result<TransportParts> {
		debug!(url, "opening inspector websocket");
		let (stream, response) = tokio_tungstenite::connect_async(url).await?;
		trace!(status = %response.status(), "websocket handshake complete");
		Ok(Self::from_stream(stream))
	}

	/// Wraps an already established WebSocket stream.
	pub fn from_stream<S>(stream: WebSocketStream<S>) -> TransportParts
	where
		S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
	{
		let (sink, stream) = stream.split();
		TransportParts {
			sender: Box::new(WebSocketTransportSender { sink }),
			receiver: Box::new(WebSocketTransportReceiver { stream }),
		}
	}
}

/// Outbound half of a [`WebSocketTransport`].
pub struct WebSocketTransportSender<S> {
	sink: SplitSink<WebSocketStream<S>, Message>,
}

impl<S> TransportSender for WebSocketTransportSender<S>
where
	S: AsyncRead + AsyncWrite + Unpin + Send,
{
	fn send(&mut self, message: String) -> TransportFuture<'_, Result<()>> {
		Box::pin(async move {
			self.sink.send(Message::Text(message)).await?;
			Ok(())
		})
	}

	fn close(&mut self) -> TransportFuture<'_, Result<()>> {
		Box::pin(async move {
			match self.sink.close().await {
				Ok(()) => Ok(()),
				// Peer already went away; nothing left to shut down.
				Err(tokio_tungstenite::tungstenite::Error::ConnectionClosed | tokio_tungstenite::tungstenite::Error::AlreadyClosed) => Ok(()),
				Err(e) => Err(e.into()),
			}
		})
	}
}

/// Inbound half of a [`WebSocketTransport`].
pub struct WebSocketTransportReceiver<S> {
	stream: SplitStream<WebSocketStream<S>>,
}

impl<S> TransportReceiver for WebSocketTransportReceiver<S>
where
	S: AsyncRead + AsyncWrite + Unpin + Send,
{
	fn recv(&mut self) -> TransportFuture<'_, Option<Result<String>>> {
		Box::pin(async move {
			loop {
				match self.stream.next().await? {
					Ok(Message::Text(text)) => return Some(Ok(text)),
					Ok(Message::Binary(bytes)) => {
						return Some(String::from_utf8(bytes).map_err(|e| Error::TransportError(format!("binary frame is not UTF-8: {e}"))));
					}
					Ok(Message::Close(frame)) => {
						debug!(?frame, "inspector closed websocket");
						return None;
					}
					Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => continue,
					Err(tokio_tungstenite::tungstenite::Error::ConnectionClosed) => return None,
					Err(e) => return Some(Err(e.into())),
				}
			}
		})
	}
}
