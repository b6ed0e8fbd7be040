use clap::Parser;
use tracing::error;

mod cli;
mod commands;
mod error;
mod logging;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(err) = commands::dispatch(cli).await {
        if !err.is_already_reported() {
            error!(target = "rp", error = %err, "command failed");
        }
        std::process::exit(1);
    }
}
