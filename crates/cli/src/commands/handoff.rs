use rp_client::{ControlPlaneConfig, CredentialStore, DeviceController};

use crate::error::{Result, RpError};

pub async fn execute(
    config: &ControlPlaneConfig,
    store: &CredentialStore,
    device_id: &str,
) -> Result<()> {
    let credential = store.get();
    if !credential.is_set() {
        eprintln!("no stored credential; run `rp connect` first");
        return Err(RpError::AlreadyReported);
    }

    let taken = DeviceController::new(config.clone())?
        .take_over_playback(&credential, device_id)
        .await?;

    if taken {
        println!("playback transferred to {device_id}");
        Ok(())
    } else {
        eprintln!("device {device_id} is unavailable for handoff");
        Err(RpError::AlreadyReported)
    }
}
