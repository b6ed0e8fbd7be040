use rp_client::{ControlPlaneConfig, CredentialStore, SessionChecker};
use rp_protocol::auth;

use crate::cli::CredsAction;
use crate::error::Result;

pub async fn execute(
    config: &ControlPlaneConfig,
    store: &CredentialStore,
    action: CredsAction,
) -> Result<()> {
    match action {
        CredsAction::Show => {
            let credential = store.get();
            if !credential.is_set() {
                println!("no credential stored");
                return Ok(());
            }
            match credential.expires_at {
                Some(ms) => println!("credential stored; expires at {ms} (epoch ms)"),
                None => println!("credential stored; no expiry recorded"),
            }
            Ok(())
        }
        CredsAction::Clear => {
            store.clear()?;
            println!("credential cleared");
            Ok(())
        }
        CredsAction::Refresh { user, password } => {
            let token = auth::basic_credentials(&user, &password);
            let credential = SessionChecker::new(config.clone(), store.clone())?
                .refresh_access_token(&token)
                .await?;
            match credential.expires_at {
                Some(ms) => println!("credential refreshed; expires at {ms} (epoch ms)"),
                None => println!("credential refreshed"),
            }
            Ok(())
        }
    }
}
