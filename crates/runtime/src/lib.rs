//! Player channel runtime - transport and connection state machine.
//!
//! This crate provides the low-level runtime for the persistent duplex
//! channel between a player endpoint and the control plane:
//!
//! - **Transport**: Bidirectional JSON frames over WebSocket, plus an
//!   in-memory fake for tests
//! - **Connection**: The credential-bootstrap state machine
//!   (`Idle → Connecting → AwaitingBootstrap → Ready`, with `Closed` and
//!   `Errored` terminal states)
//!
//! # Decoupling via TokenStore
//!
//! The [`ConnectionManager`] persists the bootstrapped access token
//! through the [`TokenStore`] trait rather than a concrete store type.
//! The durable credential store lives in `rp-client` and implements the
//! trait, keeping this crate independent of storage concerns.

pub mod connection;
pub mod error;
pub mod transport;

pub use connection::{ConnectionEvent, ConnectionManager, ConnectionState, TokenStore};
pub use error::{Error, Result};
pub use transport::{
    FakeTransportBuilder, FakeTransportController, Transport, TransportParts, TransportReceiver,
    WebSocketTransport,
};
