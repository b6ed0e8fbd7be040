//! Cookie-session and credential-refresh calls.

use chrono::DateTime;
use reqwest::header::AUTHORIZATION;
use rp_protocol::{AccessTokenData, ConnectResponse, LoginResponse, auth};

use crate::config::ControlPlaneConfig;
use crate::credentials::{Credential, CredentialStore};
use crate::error::Result;
use crate::http;

/// Checks the human login session and manages credential refresh.
///
/// `check_session` and `connect_as_controller` ride the cookie session;
/// `refresh_access_token` authenticates with the player's own basic
/// token instead and is the only path that yields an expiry.
pub struct SessionChecker {
    http: reqwest::Client,
    config: ControlPlaneConfig,
    store: CredentialStore,
}

impl SessionChecker {
    pub fn new(config: ControlPlaneConfig, store: CredentialStore) -> Result<Self> {
        Ok(Self {
            http: http::client()?,
            config,
            store,
        })
    }

    /// Reports whether the cookie session is logged in. On
    /// `logged_in: false` the caller is expected to send the user to
    /// `redirect_url`; there is no retry here.
    ///
    /// The success body is bare `LoginResponse` JSON, not the envelope.
    pub async fn check_session(&self) -> Result<LoginResponse> {
        let url = self.config.endpoint("api/auth/login")?;
        let response = self.http.get(url).send().await?;
        http::read_bare(response).await
    }

    /// Claims the controller role for the logged-in session. Answers
    /// with bare `ConnectResponse` JSON.
    pub async fn connect_as_controller(&self) -> Result<ConnectResponse> {
        let url = self.config.endpoint("api/player/connect")?;
        let response = self.http.post(url).send().await?;
        http::read_bare(response).await
    }

    /// Fetches a fresh access credential using the player's basic token
    /// and persists it, expiry included.
    pub async fn refresh_access_token(&self, basic_token: &str) -> Result<Credential> {
        let url = self.config.endpoint("api/player/connect")?;
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, auth::basic_header(basic_token))
            .send()
            .await?;
        let data: AccessTokenData = http::read_envelope(response).await?;

        let expires_at = DateTime::parse_from_rfc3339(&data.expires_at)?.timestamp_millis();
        self.store.save(&data.access_token, expires_at)?;
        tracing::debug!(expires_at, "refreshed access credential");

        Ok(Credential {
            access_token: data.access_token,
            expires_at: Some(expires_at),
        })
    }
}
