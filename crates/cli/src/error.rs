use thiserror::Error;

pub type Result<T> = std::result::Result<T, RpError>;

#[derive(Debug, Error)]
pub enum RpError {
	/// Outcome was already reported to the user; exit 1 without extra
	/// output.
	#[error("")]
	AlreadyReported,

	#[error("not logged in; open {0} to sign in")]
	NotLoggedIn(String),

	#[error(transparent)]
	Client(#[from] rp_client::Error),

	#[error(transparent)]
	Runtime(#[from] rp_runtime::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl RpError {
	pub fn is_already_reported(&self) -> bool {
		matches!(self, RpError::AlreadyReported)
	}
}
