//! Error types for the control-plane client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the HTTP API surface and the credential store.
#[derive(Debug, Error)]
pub enum Error {
	/// The request never completed (DNS, TCP, TLS, timeout).
	#[error("transport error: {0}")]
	Transport(#[from] reqwest::Error),

	/// The control plane answered with a non-success status.
	#[error("control plane returned {status}{}", fmt_error_code(.error_code))]
	Response {
		status: reqwest::StatusCode,
		error_code: Option<String>,
	},

	/// The stored credential's expiry has passed; detected locally
	/// before the request is sent. Refresh before retrying.
	#[error("access credential has expired")]
	AuthExpired,

	/// Credential store I/O failure.
	#[error("credential store error: {0}")]
	Store(#[from] std::io::Error),

	/// Response body did not match the expected shape.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// The control plane sent an expiry that is not RFC 3339.
	#[error("malformed expiry timestamp: {0}")]
	InvalidExpiry(#[from] chrono::ParseError),

	/// The configured host/port does not form a valid base URL.
	#[error("invalid control plane URL: {0}")]
	InvalidBaseUrl(#[from] url::ParseError),
}

fn fmt_error_code(error_code: &Option<String>) -> String {
	match error_code {
		Some(code) => format!(" ({code})"),
		None => String::new(),
	}
}
