//! Frame types for the persistent player channel.
//!
//! The channel is a single ordered stream of JSON text frames. The client
//! sends [`ChannelCommand`]s and the control plane answers with
//! [`ChannelResponse`]s. The only command defined in this protocol version
//! is `connect`, which asks the control plane to deliver an access token
//! for the freshly opened channel.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command tag for the credential bootstrap exchange.
pub const COMMAND_CONNECT: &str = "connect";

/// Client-to-server channel frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelCommand {
    /// Command tag (e.g. `"connect"`).
    pub command: String,
    /// Optional string-to-string payload; absent for `connect`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<HashMap<String, String>>,
}

impl ChannelCommand {
    /// The `connect` command requesting credential bootstrap.
    pub fn connect() -> Self {
        Self {
            command: COMMAND_CONNECT.to_string(),
            payload: None,
        }
    }
}

/// Server-to-client channel frame.
///
/// The body is tag-dependent; unrecognized tags are a forward-compatible
/// no-op for the client, so the body is kept as raw JSON and parsed only
/// once the tag is known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelResponse {
    /// Command tag this frame answers.
    pub command: String,
    /// Tag-dependent payload.
    #[serde(default)]
    pub body: Value,
}

impl ChannelResponse {
    /// Parses the body of a `connect` response.
    ///
    /// Returns `None` when the tag is not `connect` or the body does not
    /// have the expected shape.
    pub fn connect_body(&self) -> Option<ConnectBody> {
        if self.command != COMMAND_CONNECT {
            return None;
        }
        serde_json::from_value(self.body.clone()).ok()
    }
}

/// Body of a `connect` response: the bootstrapped access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectBody {
    pub access_token: String,
}
