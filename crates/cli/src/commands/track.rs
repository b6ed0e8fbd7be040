use rp_client::{ControlPlaneConfig, CredentialStore, PlaybackResolver};

use crate::error::Result;

pub async fn execute(
    config: &ControlPlaneConfig,
    store: &CredentialStore,
    track_id: &str,
) -> Result<()> {
    let track = PlaybackResolver::new(config.clone())?
        .get_track(&store.get(), track_id)
        .await?;

    if track.external_urls.is_empty() {
        println!("no external urls for {track_id}");
        return Ok(());
    }

    // Stable output regardless of map iteration order.
    let mut urls: Vec<_> = track.external_urls.iter().collect();
    urls.sort();
    for (provider, url) in urls {
        println!("{provider}: {url}");
    }

    Ok(())
}
