//! Device listing and exclusive playback handoff.

use reqwest::StatusCode;
use rp_protocol::{ControlPlaybackRequest, Device, DevicesData};

use crate::config::ControlPlaneConfig;
use crate::credentials::Credential;
use crate::error::Result;
use crate::http;

/// Lists playback devices and claims exclusive playback on one.
pub struct DeviceController {
    http: reqwest::Client,
    config: ControlPlaneConfig,
}

impl DeviceController {
    pub fn new(config: ControlPlaneConfig) -> Result<Self> {
        Ok(Self {
            http: http::client()?,
            config,
        })
    }

    /// Fetches the device listing. Server order is preserved exactly;
    /// callers rely on it for stable display.
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        let url = self.config.endpoint("api/device/all")?;
        let response = self.http.get(url).send().await?;
        let data: DevicesData = http::read_envelope(response).await?;
        Ok(data.devices)
    }

    /// Requests exclusive playback on `device_id`.
    ///
    /// The credential travels in the body, not a cookie, so a headless
    /// player can claim itself. Returns `Ok(true)` on 204. Any other
    /// answer the control plane actually sent is `Ok(false)`: the device
    /// is busy or gone, which is an outcome, not a client failure. Only
    /// a request that never completed is an `Err`.
    pub async fn take_over_playback(
        &self,
        credential: &Credential,
        device_id: &str,
    ) -> Result<bool> {
        http::ensure_fresh(credential)?;
        let url = self.config.endpoint("api/device/control-playback")?;
        let body = ControlPlaybackRequest {
            access_token: credential.access_token.clone(),
            device_id: device_id.to_string(),
        };
        let response = self.http.post(url).json(&body).send().await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(true);
        }

        let error_code = http::error_code_of(response).await;
        tracing::warn!(
            status = %status,
            error_code = error_code.as_deref().unwrap_or("-"),
            device_id,
            "playback handoff refused"
        );
        Ok(false)
    }
}
