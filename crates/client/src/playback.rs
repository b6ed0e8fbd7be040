//! Track metadata and fallback source resolution.

use reqwest::header::AUTHORIZATION;
use rp_protocol::{FallbackRequest, ResolvedFallbackSource, TrackMetadata, auth};

use crate::config::ControlPlaneConfig;
use crate::credentials::Credential;
use crate::error::Result;
use crate::http;

/// Resolves what to actually play for a track.
///
/// The primary source is the track's own metadata; when that is not
/// playable the control plane resolves a search-based fallback, cached
/// server-side per track id so repeated calls are idempotent.
pub struct PlaybackResolver {
    http: reqwest::Client,
    config: ControlPlaneConfig,
}

impl PlaybackResolver {
    pub fn new(config: ControlPlaneConfig) -> Result<Self> {
        Ok(Self {
            http: http::client()?,
            config,
        })
    }

    /// Fetches track metadata. Unknown metadata fields are ignored;
    /// only the external URLs are interpreted.
    pub async fn get_track(&self, credential: &Credential, track_id: &str) -> Result<TrackMetadata> {
        http::ensure_fresh(credential)?;
        let url = self
            .config
            .endpoint(&format!("api/player/track/{track_id}"))?;
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, auth::basic_header(&credential.access_token))
            .send()
            .await?;
        http::read_envelope(response).await
    }

    /// Resolves a fallback source for `track_id` from a search `query`.
    pub async fn resolve_fallback(
        &self,
        credential: &Credential,
        query: &str,
        track_id: &str,
    ) -> Result<ResolvedFallbackSource> {
        http::ensure_fresh(credential)?;
        let url = self.config.endpoint("api/player/youtube")?;
        let body = FallbackRequest {
            query: query.to_string(),
            spotify_track_id: track_id.to_string(),
            cache_results: true,
        };
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, auth::basic_header(&credential.access_token))
            .json(&body)
            .send()
            .await?;
        http::read_envelope(response).await
    }
}
