//! Remote management of the player host.

use reqwest::header::AUTHORIZATION;
use rp_protocol::{LoginQrData, PlayerCommand, PlayerCommandRequest, auth};

use crate::config::ControlPlaneConfig;
use crate::error::Result;
use crate::http;

/// Host-level controls: the login QR code and power commands.
///
/// These authenticate with the player's basic token rather than the
/// short-lived access credential.
pub struct RemoteControl {
    http: reqwest::Client,
    config: ControlPlaneConfig,
}

impl RemoteControl {
    pub fn new(config: ControlPlaneConfig) -> Result<Self> {
        Ok(Self {
            http: http::client()?,
            config,
        })
    }

    /// Fetches the login QR code as a `data:image/png;base64,...` URL.
    pub async fn login_qr(&self, basic_token: &str) -> Result<String> {
        let url = self.config.endpoint("api/player/login-qr")?;
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, auth::basic_header(basic_token))
            .send()
            .await?;
        let data: LoginQrData = http::read_envelope(response).await?;
        Ok(data.qr)
    }

    /// Sends a power command to the player host. 204 means accepted.
    pub async fn send_player_command(
        &self,
        basic_token: &str,
        command: PlayerCommand,
    ) -> Result<()> {
        let url = self.config.endpoint("api/player/command")?;
        let body = PlayerCommandRequest {
            command: command.as_str().to_string(),
        };
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, auth::basic_header(basic_token))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(http::status_error(
            status,
            http::error_code_of(response).await,
        ))
    }
}
