//! Control-plane client for the player endpoint.
//!
//! Everything a player needs besides the live channel (which lives in
//! `rp-runtime`):
//!
//! - **Credentials**: durable `{access_token, expires_at}` storage under
//!   the XDG config dir; implements `rp_runtime::TokenStore` so the
//!   channel bootstrap persists through the same file
//! - **Session**: cookie-session checks and the basic-auth credential
//!   refresh path
//! - **Devices**: listing plus the exclusive playback handoff
//! - **Playback**: track metadata and search-based fallback resolution
//! - **Remote**: login QR and host power commands

pub mod config;
pub mod credentials;
pub mod device;
pub mod error;
mod http;
pub mod playback;
pub mod remote;
pub mod session;

pub use config::ControlPlaneConfig;
pub use credentials::{Credential, CredentialStore};
pub use device::DeviceController;
pub use error::{Error, Result};
pub use playback::PlaybackResolver;
pub use remote::RemoteControl;
pub use session::SessionChecker;
