//! Wire types for the player control-plane protocol.
//!
//! This crate contains the serde-serializable types exchanged with the
//! control plane, both over the persistent websocket channel and over its
//! HTTP API. These types represent the "protocol layer" - the shapes of
//! data as they appear on the wire.
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization
//! - **1:1 with the wire**: Field names match the control plane's JSON
//! - **Stable**: Changes only when the wire protocol changes
//!
//! Higher-level APIs are built on top of these types in `rp-client` and
//! `rp-runtime`.

pub mod api;
pub mod auth;
pub mod channel;

pub use api::*;
pub use auth::*;
pub use channel::*;
