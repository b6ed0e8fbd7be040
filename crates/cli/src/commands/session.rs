use rp_client::{ControlPlaneConfig, CredentialStore, SessionChecker};

use crate::error::{Result, RpError};

pub async fn execute(config: &ControlPlaneConfig, store: &CredentialStore) -> Result<()> {
    let checker = SessionChecker::new(config.clone(), store.clone())?;
    let login = checker.check_session().await?;

    if !login.logged_in {
        return Err(RpError::NotLoggedIn(login.redirect_url));
    }

    match login.user {
        Some(user) => {
            let role = if user.is_controller {
                "controller"
            } else {
                "listener"
            };
            println!("logged in as {} ({role})", user.display_name);
        }
        None => println!("logged in"),
    }

    Ok(())
}
