//! Error types for the channel runtime.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur on the player channel.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to establish the channel with the control plane.
    #[error("failed to connect to control plane: {0}")]
    ConnectionFailed(String),

    /// Transport-level error after the channel was established.
    #[error("transport error: {0}")]
    Transport(String),

    /// Credential bootstrap did not complete within the bounded wait.
    #[error("credential bootstrap timed out after {0:?}")]
    BootstrapTimeout(Duration),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
