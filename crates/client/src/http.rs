//! Shared HTTP plumbing: envelope decoding and status mapping.

use chrono::Utc;
use reqwest::{Response, StatusCode};
use rp_protocol::ApiResponse;
use serde::de::DeserializeOwned;

use crate::credentials::Credential;
use crate::error::{Error, Result};

/// Builds the client used by the API surface. Cookie support is on so
/// the session established by `/api/auth/login` carries to later calls.
pub(crate) fn client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().cookie_store(true).build()?)
}

/// Refuses to spend a credential whose stored expiry has passed. A
/// credential without an expiry passes through; the control plane
/// stays the authority on validity.
pub(crate) fn ensure_fresh(credential: &Credential) -> Result<()> {
    if credential.is_expired(Utc::now().timestamp_millis()) {
        return Err(Error::AuthExpired);
    }
    Ok(())
}

/// Decodes the standard `{data, error_code}` envelope.
///
/// Non-success statuses map to [`Error::Response`] carrying whatever
/// `error_code` the body held. A success envelope without `data` is
/// treated as a malformed response.
pub(crate) async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(status_error(status, error_code_of(response).await));
    }

    let envelope: ApiResponse<T> = response.json().await?;
    let error_code = envelope.error_code().map(str::to_string);
    envelope.data.ok_or(Error::Response { status, error_code })
}

/// Decodes a response whose success body is bare JSON, not the
/// envelope. The login and controller-connect endpoints answer this
/// way; their error paths still carry the envelope, so `error_code`
/// extraction stays best-effort.
pub(crate) async fn read_bare<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(status_error(status, error_code_of(response).await));
    }
    Ok(response.json().await?)
}

/// Best-effort extraction of the envelope `error_code` from a failed
/// response body.
pub(crate) async fn error_code_of(response: Response) -> Option<String> {
    let envelope = response.json::<ApiResponse<serde_json::Value>>().await.ok()?;
    envelope.error_code().map(str::to_string)
}

pub(crate) fn status_error(status: StatusCode, error_code: Option<String>) -> Error {
    Error::Response { status, error_code }
}
