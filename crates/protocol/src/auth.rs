//! Authorization header helpers.
//!
//! The control plane issues an opaque credential and expects it on the
//! `Basic` scheme (the credential is server-issued, not a user:password
//! pair the client assembles, but the header shape is the same).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Builds an `Authorization` header value from an opaque server-issued
/// credential.
pub fn basic_header(token: &str) -> String {
    format!("Basic {token}")
}

/// Encodes a `user:password` pair into the token form `basic_header`
/// expects.
pub fn basic_credentials(user: &str, password: &str) -> String {
    STANDARD.encode(format!("{user}:{password}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_prefixes_scheme() {
        assert_eq!(basic_header("abc123"), "Basic abc123");
    }

    #[test]
    fn credentials_encode_as_base64_pair() {
        // "player:secret" in base64
        assert_eq!(basic_credentials("player", "secret"), "cGxheWVyOnNlY3JldA==");
    }
}
