mod connect;
mod creds;
mod devices;
mod fallback;
mod handoff;
mod remote;
mod session;
mod track;

use std::path::PathBuf;

use rp_client::config::DEFAULT_PORT;
use rp_client::{ControlPlaneConfig, CredentialStore};

use crate::cli::{Cli, Commands};
use crate::error::Result;

pub async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        verbose: _,
        host,
        port,
        credentials,
        command,
    } = cli;

    // Flags win over env; env wins over defaults.
    let host = host
        .or_else(|| std::env::var("RP_HOST").ok())
        .unwrap_or_else(|| "localhost".to_string());
    let port = port
        .or_else(|| std::env::var("RP_PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or(DEFAULT_PORT);
    let config = ControlPlaneConfig::new(host, port);

    let store = credentials
        .or_else(|| std::env::var_os("RP_CREDENTIALS").map(PathBuf::from))
        .map(CredentialStore::at)
        .unwrap_or_default();

    match command {
        Commands::Session => session::execute(&config, &store).await,
        Commands::Connect { timeout_secs } => connect::execute(&config, store, timeout_secs).await,
        Commands::Devices { json } => devices::execute(&config, json).await,
        Commands::Handoff { device_id } => handoff::execute(&config, &store, &device_id).await,
        Commands::Track { track_id } => track::execute(&config, &store, &track_id).await,
        Commands::Fallback { track_id, query } => {
            fallback::execute(&config, &store, &query, &track_id).await
        }
        Commands::Creds { action } => creds::execute(&config, &store, action).await,
        Commands::Remote {
            user,
            password,
            action,
        } => remote::execute(&config, &user, &password, action).await,
    }
}
