use rp_client::{ControlPlaneConfig, RemoteControl};
use rp_protocol::{PlayerCommand, auth};

use crate::cli::RemoteAction;
use crate::error::Result;

pub async fn execute(
    config: &ControlPlaneConfig,
    user: &str,
    password: &str,
    action: RemoteAction,
) -> Result<()> {
    let token = auth::basic_credentials(user, password);
    let remote = RemoteControl::new(config.clone())?;

    match action {
        RemoteAction::LoginQr => {
            println!("{}", remote.login_qr(&token).await?);
        }
        RemoteAction::Shutdown => {
            remote
                .send_player_command(&token, PlayerCommand::Shutdown)
                .await?;
            println!("shutdown requested");
        }
        RemoteAction::Restart => {
            remote
                .send_player_command(&token, PlayerCommand::Restart)
                .await?;
            println!("restart requested");
        }
    }

    Ok(())
}
