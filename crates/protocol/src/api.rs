//! HTTP payload types for the control-plane API.
//!
//! Most endpoints wrap their payload in the [`ApiResponse`] envelope:
//! `{"data": ..., "error_code": "..."}` with `error_code` empty on
//! success. Field names are the control plane's snake_case JSON.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Standard control-plane response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "none", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Machine-readable error code; empty or absent on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

fn none<T>() -> Option<T> {
    None
}

impl<T> ApiResponse<T> {
    /// Error code, if a non-empty one was supplied.
    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref().filter(|c| !c.is_empty())
    }
}

/// Result of `GET /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub logged_in: bool,
    #[serde(default)]
    pub redirect_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserDetails>,
}

/// Controller identity attached to a logged-in session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserDetails {
    pub display_name: String,
    #[serde(default)]
    pub profile_image_url: String,
    pub is_controller: bool,
}

/// Result of `POST /api/player/connect`: a login status plus the
/// controller claim outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectResponse {
    #[serde(flatten)]
    pub login: LoginResponse,
    pub connected: bool,
}

/// `data` of `GET /api/player/connect`: an access token with its expiry
/// as an RFC 3339 timestamp. This is the only credential path that
/// carries an expiry; the channel bootstrap does not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessTokenData {
    pub access_token: String,
    pub expires_at: String,
}

/// A playback device snapshot as returned by `GET /api/device/all`.
///
/// Never mutated locally; listings are server-ordered and that order is
/// preserved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Device {
    pub id: String,
    pub is_active: bool,
    pub is_private_session: bool,
    pub is_restricted: bool,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub volume_percent: u8,
    pub supports_volume: bool,
}

/// `data` of `GET /api/device/all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicesData {
    #[serde(default)]
    pub devices: Vec<Device>,
}

/// Body of `POST /api/device/control-playback`.
///
/// Carries the bearer credential in the body; this endpoint requires no
/// cookie session so that a device without the controller's browser
/// session can still be claimed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlPlaybackRequest {
    pub access_token: String,
    pub device_id: String,
}

/// Result of `GET /api/player/track/{id}`: opaque pass-through metadata.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrackMetadata {
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

/// Body of `POST /api/player/youtube`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackRequest {
    pub query: String,
    pub spotify_track_id: String,
    pub cache_results: bool,
}

/// `data` of `POST /api/player/youtube`: the resolved fallback source,
/// cached server-side per track id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedFallbackSource {
    pub video_id: String,
}

/// `data` of `GET /api/player/login-qr`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginQrData {
    /// `data:image/png;base64,...` URL for the login QR code.
    pub qr: String,
}

/// Body of `POST /api/player/command`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerCommandRequest {
    pub command: String,
}

/// Host commands accepted by the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerCommand {
    Shutdown,
    Restart,
}

impl PlayerCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerCommand::Shutdown => "shutdown",
            PlayerCommand::Restart => "restart",
        }
    }
}
