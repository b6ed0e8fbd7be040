//! Transport layer for the player channel.
//!
//! A transport is split into a sender half ([`Transport`]) and a receiver
//! half ([`TransportReceiver`]) so the connection loop can own them
//! independently. The receiver pumps inbound frames into an ordered mpsc
//! channel; frames are therefore processed strictly in arrival order.
//!
//! Two implementations are provided: [`WebSocketTransport`] for the real
//! `wss://` channel and [`FakeTransportBuilder`] for driving the
//! connection state machine in tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::{Error, Result};

/// Sender half of a channel transport.
pub trait Transport: Send {
    /// Sends one JSON frame to the control plane.
    fn send(&mut self, message: Value) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Receiver half of a channel transport.
///
/// `run` pumps inbound frames into the mpsc receiver handed out in
/// [`TransportParts`] until the peer goes away. A clean peer close
/// resolves to `Ok(())`; a transport failure resolves to `Err`.
pub trait TransportReceiver: Send {
    fn run(self: Box<Self>) -> Pin<Box<dyn Future<Output = Result<()>> + Send>>;
}

/// The pieces of an established transport, ready to hand to a connection.
pub struct TransportParts {
    pub sender: Box<dyn Transport>,
    pub receiver: Box<dyn TransportReceiver>,
    pub message_rx: mpsc::UnboundedReceiver<Value>,
}

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// WebSocket transport speaking JSON text frames.
pub struct WebSocketTransport;

impl WebSocketTransport {
    /// Opens the channel at `url` (a `ws://` or `wss://` endpoint).
    ///
    /// Resolves once the websocket handshake completes; the returned
    /// parts carry the established stream.
    pub async fn connect(url: &str) -> Result<TransportParts> {
        let (ws, _) = connect_async(url)
            .await
            .map_err(|e| Error::ConnectionFailed(e.to_string()))?;
        let (sink, stream) = ws.split();
        let (message_tx, message_rx) = mpsc::unbounded_channel();

        Ok(TransportParts {
            sender: Box::new(WebSocketTransportSender { sink }),
            receiver: Box::new(WebSocketTransportReceiver { stream, message_tx }),
            message_rx,
        })
    }
}

struct WebSocketTransportSender {
    sink: WsSink,
}

impl Transport for WebSocketTransportSender {
    fn send(&mut self, message: Value) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let text = serde_json::to_string(&message)?;
            self.sink
                .send(Message::Text(text))
                .await
                .map_err(|e| Error::Transport(e.to_string()))
        })
    }
}

struct WebSocketTransportReceiver {
    stream: WsStream,
    message_tx: mpsc::UnboundedSender<Value>,
}

impl TransportReceiver for WebSocketTransportReceiver {
    fn run(mut self: Box<Self>) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        Box::pin(async move {
            while let Some(frame) = self.stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        let Ok(value) = serde_json::from_str::<Value>(&text) else {
                            tracing::debug!("ignoring non-JSON text frame");
                            continue;
                        };
                        if self.message_tx.send(value).is_err() {
                            break;
                        }
                    }
                    Ok(Message::Binary(bytes)) => {
                        let Ok(value) = serde_json::from_slice::<Value>(&bytes) else {
                            tracing::debug!("ignoring non-JSON binary frame");
                            continue;
                        };
                        if self.message_tx.send(value).is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => return Ok(()),
                    // Ping/pong handled by tungstenite.
                    Ok(_) => {}
                    Err(e) => return Err(Error::Transport(e.to_string())),
                }
            }
            Ok(())
        })
    }
}

/// Builder for in-memory fake transports.
pub struct FakeTransportBuilder {
    // Nothing configurable yet; kept for parity with real transports.
}

impl FakeTransportBuilder {
    pub fn new() -> Self {
        Self {}
    }

    /// Builds the fake transport, returning parts for a connection and a
    /// controller for injecting frames and inspecting sent ones.
    pub fn build(self) -> (TransportParts, FakeTransportController) {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let sent = Arc::new(Mutex::new(Vec::new()));

        let sender = FakeTransportSender {
            sent: Arc::clone(&sent),
        };
        let receiver = FakeTransportReceiver {
            inbound_rx,
            message_tx,
        };
        let controller = FakeTransportController { inbound_tx, sent };

        let parts = TransportParts {
            sender: Box::new(sender),
            receiver: Box::new(receiver),
            message_rx,
        };

        (parts, controller)
    }
}

impl Default for FakeTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

enum FakeFrame {
    Inbound(Value),
    Close,
    Fail(String),
}

/// Controller for a fake transport: simulates the control-plane side.
pub struct FakeTransportController {
    inbound_tx: mpsc::UnboundedSender<FakeFrame>,
    sent: Arc<Mutex<Vec<Value>>>,
}

impl FakeTransportController {
    /// Injects a raw JSON frame as if received from the control plane.
    pub fn inject(&self, message: Value) {
        let _ = self.inbound_tx.send(FakeFrame::Inbound(message));
    }

    /// Injects a `connect` response carrying `access_token`.
    pub fn inject_connect_response(&self, access_token: &str) {
        self.inject(serde_json::json!({
            "command": "connect",
            "body": { "access_token": access_token }
        }));
    }

    /// Simulates a clean peer-initiated close.
    pub fn close(&self) {
        let _ = self.inbound_tx.send(FakeFrame::Close);
    }

    /// Simulates a transport failure with the given diagnostic.
    pub fn fail(&self, message: &str) {
        let _ = self.inbound_tx.send(FakeFrame::Fail(message.to_string()));
    }

    /// Takes all frames the client sent so far, clearing the buffer.
    pub async fn take_sent(&self) -> Vec<Value> {
        std::mem::take(&mut *self.sent.lock().await)
    }
}

struct FakeTransportSender {
    sent: Arc<Mutex<Vec<Value>>>,
}

impl Transport for FakeTransportSender {
    fn send(&mut self, message: Value) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let sent = Arc::clone(&self.sent);
        Box::pin(async move {
            sent.lock().await.push(message);
            Ok(())
        })
    }
}

struct FakeTransportReceiver {
    inbound_rx: mpsc::UnboundedReceiver<FakeFrame>,
    message_tx: mpsc::UnboundedSender<Value>,
}

impl TransportReceiver for FakeTransportReceiver {
    fn run(mut self: Box<Self>) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        Box::pin(async move {
            while let Some(frame) = self.inbound_rx.recv().await {
                match frame {
                    FakeFrame::Inbound(message) => {
                        if self.message_tx.send(message).is_err() {
                            break;
                        }
                    }
                    FakeFrame::Close => return Ok(()),
                    FakeFrame::Fail(message) => return Err(Error::Transport(message)),
                }
            }
            Ok(())
        })
    }
}
