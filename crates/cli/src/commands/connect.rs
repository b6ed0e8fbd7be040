use std::sync::Arc;
use std::time::Duration;

use rp_client::{ControlPlaneConfig, CredentialStore};
use rp_runtime::{ConnectionEvent, ConnectionManager, WebSocketTransport};
use tracing::info;

use crate::error::{Result, RpError};

pub async fn execute(
    config: &ControlPlaneConfig,
    store: CredentialStore,
    timeout_secs: u64,
) -> Result<()> {
    let url = config.ws_url()?;
    info!(target = "rp.connect", url = %url, "opening player channel");

    let parts = WebSocketTransport::connect(url.as_str()).await?;
    let (manager, mut events) = ConnectionManager::new(parts, Arc::new(store));
    let run = tokio::spawn(manager.run());

    let outcome = tokio::time::timeout(Duration::from_secs(timeout_secs), events.recv()).await;
    match outcome {
        Ok(Some(ConnectionEvent::Connected { .. })) => {
            println!("connected; credential stored");
            run.abort();
            Ok(())
        }
        Ok(Some(ConnectionEvent::Error { message })) => {
            eprintln!("channel error: {message}");
            Err(RpError::AlreadyReported)
        }
        Ok(Some(ConnectionEvent::Closed { message })) => {
            eprintln!("channel closed: {message}");
            Err(RpError::AlreadyReported)
        }
        Ok(None) => {
            eprintln!("channel ended without reporting an outcome");
            Err(RpError::AlreadyReported)
        }
        Err(_) => {
            eprintln!("channel not ready after {timeout_secs}s");
            run.abort();
            Err(RpError::AlreadyReported)
        }
    }
}
