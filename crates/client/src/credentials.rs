//! Durable storage for the player's access credential.
//!
//! The store is a small JSON file under the XDG config dir with two
//! independent string-keyed entries, `access_token` and `expires_at`
//! (epoch milliseconds, stored as a string). Either key may be absent.
//! Reads never fail: a missing or unreadable file is simply the unset
//! credential. Writes replace the whole file; last writer wins.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An access credential as held by the player endpoint.
///
/// Unset is modeled as an empty token, not an `Option`, mirroring the
/// on-disk shape where the key is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
	pub access_token: String,
	/// Expiry as epoch milliseconds. `None` when the issuing path did not
	/// supply one (the channel bootstrap never does).
	pub expires_at: Option<i64>,
}

impl Credential {
	pub fn is_set(&self) -> bool {
		!self.access_token.is_empty()
	}

	/// Compares the expiry against `now_ms`. A credential without an
	/// expiry is never reported expired here; the control plane remains
	/// the authority on validity.
	pub fn is_expired(&self, now_ms: i64) -> bool {
		matches!(self.expires_at, Some(at) if at <= now_ms)
	}
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	access_token: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	expires_at: Option<String>,
}

/// File-backed credential store.
#[derive(Debug, Clone)]
pub struct CredentialStore {
	path: PathBuf,
}

impl CredentialStore {
	/// Store at the default location,
	/// `$XDG_CONFIG_HOME/rp/credentials.json`.
	pub fn new() -> Self {
		Self::at(default_store_path())
	}

	/// Store at an explicit path. Used by tests and daemon setups.
	pub fn at(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Reads the stored credential. Never fails; any unreadable or
	/// unparseable state yields the unset credential.
	pub fn get(&self) -> Credential {
		let file = self.read_file();
		Credential {
			access_token: file.access_token.unwrap_or_default(),
			expires_at: file.expires_at.and_then(|ms| ms.parse().ok()),
		}
	}

	/// Stores a credential with its expiry (epoch milliseconds). Both
	/// fields are written in a single file write.
	pub fn save(&self, access_token: &str, expires_at: i64) -> Result<()> {
		self.write_file(&StoreFile {
			access_token: Some(access_token.to_string()),
			expires_at: Some(expires_at.to_string()),
		})?;
		Ok(())
	}

	/// Stores a token that arrived without an expiry. Any previously
	/// stored expiry is dropped; it described the replaced token.
	pub fn save_access_token(&self, access_token: &str) -> Result<()> {
		self.write_token_only(access_token)?;
		Ok(())
	}

	/// Clears the store back to unset.
	pub fn clear(&self) -> Result<()> {
		match fs::remove_file(&self.path) {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(e.into()),
		}
	}

	fn write_token_only(&self, access_token: &str) -> std::io::Result<()> {
		self.write_file(&StoreFile {
			access_token: Some(access_token.to_string()),
			expires_at: None,
		})
	}

	fn read_file(&self) -> StoreFile {
		fs::read_to_string(&self.path)
			.ok()
			.and_then(|content| serde_json::from_str(&content).ok())
			.unwrap_or_default()
	}

	fn write_file(&self, file: &StoreFile) -> std::io::Result<()> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)?;
		}
		let json = serde_json::to_string_pretty(file).map_err(std::io::Error::other)?;
		fs::write(&self.path, json)?;

		// The token authorizes playback control; keep it owner-only.
		#[cfg(unix)]
		{
			use std::os::unix::fs::PermissionsExt;
			fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
		}

		Ok(())
	}
}

impl Default for CredentialStore {
	fn default() -> Self {
		Self::new()
	}
}

impl rp_runtime::TokenStore for CredentialStore {
	fn load_token(&self) -> Option<String> {
		let credential = self.get();
		credential.is_set().then_some(credential.access_token)
	}

	fn save_token(&self, token: &str) -> std::io::Result<()> {
		self.write_token_only(token)
	}
}

fn default_store_path() -> PathBuf {
	let base = std::env::var_os("XDG_CONFIG_HOME")
		.map(PathBuf::from)
		.or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
		.unwrap_or_else(|| PathBuf::from("."));
	base.join("rp").join("credentials.json")
}
