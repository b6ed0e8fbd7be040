//! Connection state machine for the player channel.
//!
//! This module implements the credential-bootstrap protocol on top of the
//! transport. One logical actor drives the machine: frames arrive on an
//! ordered mpsc channel and are processed to completion, so there is no
//! internal data race and no locking around the state itself.
//!
//! # States
//!
//! ```text
//! Idle → Connecting → AwaitingBootstrap → Ready
//!                   ╲         │      ╲      │
//!                    ╲        ▼       ╲     ▼
//!                     ──→ Errored      ──→ Closed
//! ```
//!
//! The bootstrap branch exists because a previously-connected player
//! should not re-request a token each session: if the injected
//! [`TokenStore`] already holds a non-empty token the machine goes
//! straight to `Ready` without sending a frame. Otherwise it sends exactly
//! one `connect` command and waits (bounded) for the matching response,
//! persisting the received token before reporting readiness.
//!
//! Outcomes are reported as [`ConnectionEvent`]s on an mpsc queue rather
//! than ad hoc callbacks, which keeps the unexpected-message cases
//! testable in isolation.

use std::sync::Arc;
use std::time::Duration;

use rp_protocol::{COMMAND_CONNECT, ChannelCommand, ChannelResponse};
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::error::Error;
use crate::transport::TransportParts;

/// Bounded wait for the bootstrap response. The protocol itself specifies
/// no timeout; without one a lost response would leave the machine stuck
/// in `AwaitingBootstrap` forever.
pub const DEFAULT_BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the bootstrapped access token is persisted.
///
/// Implemented by the durable credential store in `rp-client`; this trait
/// keeps the runtime independent of storage concerns.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, or `None` when the store is unset.
    fn load_token(&self) -> Option<String>;

    /// Persists a freshly bootstrapped token. The channel supplies no
    /// expiry, so none is stored on this path.
    fn save_token(&self, token: &str) -> std::io::Result<()>;
}

/// Lifecycle states of the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    AwaitingBootstrap,
    Ready,
    Closed,
    Errored,
}

/// Events emitted by [`ConnectionManager::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The channel is ready and a valid credential is available. Emitted
    /// at most once per connection attempt.
    Connected { access_token: String },
    /// The transport reported a protocol or network error. No auto-retry.
    Error { message: String },
    /// The peer (or the network) closed the channel. Modeled like an
    /// error for the caller; there is no distinct expected-close signal.
    Closed { message: String },
}

/// Drives the credential-bootstrap protocol over an established transport.
pub struct ConnectionManager {
    parts: TransportParts,
    store: Arc<dyn TokenStore>,
    bootstrap_timeout: Duration,
    state_tx: watch::Sender<ConnectionState>,
    events_tx: mpsc::UnboundedSender<ConnectionEvent>,
}

impl ConnectionManager {
    /// Creates a manager over `parts`, persisting bootstrapped tokens in
    /// `store`. The returned receiver yields [`ConnectionEvent`]s.
    pub fn new(
        parts: TransportParts,
        store: Arc<dyn TokenStore>,
    ) -> (Self, mpsc::UnboundedReceiver<ConnectionEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(ConnectionState::Idle);
        let manager = Self {
            parts,
            store,
            bootstrap_timeout: DEFAULT_BOOTSTRAP_TIMEOUT,
            state_tx,
            events_tx,
        };
        (manager, events_rx)
    }

    /// Overrides the bounded wait for the bootstrap response.
    pub fn with_bootstrap_timeout(mut self, timeout: Duration) -> Self {
        self.bootstrap_timeout = timeout;
        self
    }

    /// Returns a watch handle observing state transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Runs the machine to a terminal state (`Closed` or `Errored`).
    ///
    /// Consumes the manager; spawn it as a task and watch the event
    /// queue. Dropping the future abandons any pending bootstrap - the
    /// `Connected` event for that attempt is never emitted.
    pub async fn run(self) {
        let Self {
            parts,
            store,
            bootstrap_timeout,
            state_tx,
            events_tx,
        } = self;
        let TransportParts {
            mut sender,
            receiver,
            mut message_rx,
        } = parts;

        // send_replace, not send: the state must stay current even when
        // no receiver is subscribed (send is a no-op without receivers).
        state_tx.send_replace(ConnectionState::Connecting);
        let receiver_task = tokio::spawn(receiver.run());

        // Bootstrap decision: reuse a stored token or request one over
        // the channel.
        let mut bootstrap_deadline = None;
        match store.load_token().filter(|t| !t.is_empty()) {
            Some(token) => {
                tracing::debug!("stored access token found, skipping bootstrap");
                state_tx.send_replace(ConnectionState::Ready);
                let _ = events_tx.send(ConnectionEvent::Connected {
                    access_token: token,
                });
            }
            None => {
                let frame = match serde_json::to_value(ChannelCommand::connect()) {
                    Ok(frame) => frame,
                    Err(e) => {
                        fail(&state_tx, &events_tx, Error::Json(e).to_string());
                        receiver_task.abort();
                        return;
                    }
                };
                if let Err(e) = sender.send(frame).await {
                    fail(&state_tx, &events_tx, e.to_string());
                    receiver_task.abort();
                    return;
                }
                state_tx.send_replace(ConnectionState::AwaitingBootstrap);
                bootstrap_deadline = Some(Instant::now() + bootstrap_timeout);
            }
        }

        loop {
            let next = match bootstrap_deadline {
                Some(deadline) => {
                    match tokio::time::timeout_at(deadline, message_rx.recv()).await {
                        Ok(next) => next,
                        Err(_) => {
                            fail(
                                &state_tx,
                                &events_tx,
                                Error::BootstrapTimeout(bootstrap_timeout).to_string(),
                            );
                            receiver_task.abort();
                            return;
                        }
                    }
                }
                None => message_rx.recv().await,
            };

            let Some(frame) = next else {
                // Inbound stream ended: distinguish clean close from a
                // transport failure via the receiver task's result.
                match receiver_task.await {
                    Ok(Ok(())) => {
                        state_tx.send_replace(ConnectionState::Closed);
                        let _ = events_tx.send(ConnectionEvent::Closed {
                            message: "channel closed by control plane".to_string(),
                        });
                    }
                    Ok(Err(e)) => fail(&state_tx, &events_tx, e.to_string()),
                    Err(e) => fail(&state_tx, &events_tx, e.to_string()),
                }
                return;
            };

            let awaiting = *state_tx.borrow() == ConnectionState::AwaitingBootstrap;
            if let Some(token) = bootstrap_token(frame, awaiting) {
                // Channel-path persistence: token only, expiry absent.
                if let Err(e) = store.save_token(&token) {
                    tracing::warn!("failed to persist access token: {e}");
                }
                bootstrap_deadline = None;
                state_tx.send_replace(ConnectionState::Ready);
                let _ = events_tx.send(ConnectionEvent::Connected {
                    access_token: token,
                });
            }
        }
    }
}

/// Extracts the bootstrap token from a frame, if it is the one we are
/// waiting for. Everything else - unknown tags, a `connect` response when
/// no bootstrap is pending, malformed payloads - is dropped as a
/// forward-compatible no-op.
fn bootstrap_token(frame: Value, awaiting: bool) -> Option<String> {
    let response: ChannelResponse = match serde_json::from_value(frame) {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("ignoring malformed channel frame: {e}");
            return None;
        }
    };

    if response.command != COMMAND_CONNECT {
        tracing::debug!(command = %response.command, "ignoring unknown channel command");
        return None;
    }
    if !awaiting {
        tracing::debug!("ignoring connect response with no bootstrap pending");
        return None;
    }

    match response.connect_body() {
        Some(body) if !body.access_token.is_empty() => Some(body.access_token),
        _ => {
            tracing::debug!("ignoring connect response with malformed body");
            None
        }
    }
}

fn fail(
    state_tx: &watch::Sender<ConnectionState>,
    events_tx: &mpsc::UnboundedSender<ConnectionEvent>,
    message: String,
) {
    state_tx.send_replace(ConnectionState::Errored);
    let _ = events_tx.send(ConnectionEvent::Error { message });
}
