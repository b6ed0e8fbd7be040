//! Control-plane endpoint configuration.

use url::Url;

use crate::error::Result;

pub const DEFAULT_PORT: u16 = 8080;

/// Where the control plane lives. Built from CLI flags with `RP_HOST` /
/// `RP_PORT` as env fallback.
#[derive(Debug, Clone)]
pub struct ControlPlaneConfig {
    host: String,
    port: u16,
    secure: bool,
}

impl ControlPlaneConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            secure: true,
        }
    }

    /// Switches to plain `http://` / `ws://`. Local fixtures only.
    pub fn insecure(mut self) -> Self {
        self.secure = false;
        self
    }

    /// Base URL for HTTP API calls.
    pub fn http_base(&self) -> Result<Url> {
        let scheme = if self.secure { "https" } else { "http" };
        Ok(Url::parse(&format!(
            "{scheme}://{}:{}/",
            self.host, self.port
        ))?)
    }

    /// Resolves an API path against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.http_base()?.join(path)?)
    }

    /// The player channel endpoint.
    pub fn ws_url(&self) -> Result<Url> {
        let scheme = if self.secure { "wss" } else { "ws" };
        Ok(Url::parse(&format!(
            "{scheme}://{}:{}/api/player/ws",
            self.host, self.port
        ))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_resolve_against_base() {
        let config = ControlPlaneConfig::new("play.example", 9443);
        assert_eq!(
            config.endpoint("api/device/all").unwrap().as_str(),
            "https://play.example:9443/api/device/all"
        );
        assert_eq!(
            config.ws_url().unwrap().as_str(),
            "wss://play.example:9443/api/player/ws"
        );
    }

    #[test]
    fn insecure_drops_tls_schemes() {
        let config = ControlPlaneConfig::new("127.0.0.1", 8080).insecure();
        assert_eq!(
            config.http_base().unwrap().as_str(),
            "http://127.0.0.1:8080/"
        );
        assert!(config.ws_url().unwrap().as_str().starts_with("ws://"));
    }
}
