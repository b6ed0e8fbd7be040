use rp_client::{ControlPlaneConfig, DeviceController};

use crate::error::Result;

pub async fn execute(config: &ControlPlaneConfig, json: bool) -> Result<()> {
    let devices = DeviceController::new(config.clone())?.list_devices().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }

    if devices.is_empty() {
        println!("no devices available");
        return Ok(());
    }

    // Server order, active device starred.
    for device in &devices {
        let marker = if device.is_active { "*" } else { " " };
        println!(
            "{marker} {}  {}  ({}, volume {}%)",
            device.id, device.name, device.device_type, device.volume_percent
        );
    }

    Ok(())
}
