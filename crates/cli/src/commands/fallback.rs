use rp_client::{ControlPlaneConfig, CredentialStore, PlaybackResolver};

use crate::error::Result;

pub async fn execute(
    config: &ControlPlaneConfig,
    store: &CredentialStore,
    query: &str,
    track_id: &str,
) -> Result<()> {
    let resolved = PlaybackResolver::new(config.clone())?
        .resolve_fallback(&store.get(), query, track_id)
        .await?;

    println!("{}", resolved.video_id);
    Ok(())
}
