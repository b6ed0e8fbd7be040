use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rp")]
#[command(about = "Remote player control plane client")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Control plane host (falls back to RP_HOST, then localhost)
	#[arg(long, global = true, value_name = "HOST")]
	pub host: Option<String>,

	/// Control plane port (falls back to RP_PORT, then 8080)
	#[arg(long, global = true, value_name = "PORT")]
	pub port: Option<u16>,

	/// Credential store path (falls back to RP_CREDENTIALS, then the
	/// XDG config dir)
	#[arg(long, global = true, value_name = "FILE")]
	pub credentials: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Check the login session
	Session,

	/// Open the player channel and run the credential bootstrap
	Connect {
		/// Give up if the channel is not ready within this many seconds
		#[arg(long, default_value = "30")]
		timeout_secs: u64,
	},

	/// List playback devices
	Devices {
		/// Print raw JSON instead of a listing
		#[arg(long)]
		json: bool,
	},

	/// Take over playback on a device
	Handoff {
		/// Target device id (see `rp devices`)
		device_id: String,
	},

	/// Show a track's external URLs
	Track {
		track_id: String,
	},

	/// Resolve a fallback source for a track
	Fallback {
		track_id: String,
		/// Search query, usually "artist - title"
		query: String,
	},

	/// Inspect or manage the stored credential
	Creds {
		#[command(subcommand)]
		action: CredsAction,
	},

	/// Remote-manage the player host
	Remote {
		/// Player account name for basic auth
		#[arg(long)]
		user: String,

		/// Player account password for basic auth
		#[arg(long)]
		password: String,

		#[command(subcommand)]
		action: RemoteAction,
	},
}

#[derive(Subcommand, Debug)]
pub enum CredsAction {
	/// Print the stored credential state
	Show,

	/// Clear the stored credential
	Clear,

	/// Fetch a fresh credential with basic auth and store it
	Refresh {
		/// Player account name for basic auth
		#[arg(long)]
		user: String,

		/// Player account password for basic auth
		#[arg(long)]
		password: String,
	},
}

#[derive(Subcommand, Debug)]
pub enum RemoteAction {
	/// Print the login QR code as a data URL
	LoginQr,

	/// Shut down the player host
	Shutdown,

	/// Restart the player host
	Restart,
}
