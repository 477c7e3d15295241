use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Capability path that guards sending on `port/channel`.
pub fn channel_capability_path(port: &str, channel: &str) -> String {
    format!("capabilities/ports/{port}/channels/{channel}")
}

/// Opaque authorization token bound to one capability path.
///
/// The token is a keyed BLAKE3 hash of the path under a secret held by the
/// issuer, so a holder cannot forge a token for another path. Only the
/// issuer can check it (see [`Capability::is_issued_by`]).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability {
    path: String,
    token: [u8; 32],
}

impl Capability {
    /// Issue a capability for `path` under the issuer's `secret`.
    pub fn issue(secret: &[u8; 32], path: impl Into<String>) -> Self {
        let path = path.into();
        let token = *blake3::keyed_hash(secret, path.as_bytes()).as_bytes();
        Self { path, token }
    }

    /// Rebuild a capability from a path and a hex token.
    pub fn from_parts(path: impl Into<String>, token_hex: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(token_hex).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut token = [0u8; 32];
        token.copy_from_slice(&bytes);
        Ok(Self {
            path: path.into(),
            token,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns `true` if this token was issued for `path` under `secret`.
    pub fn is_issued_by(&self, secret: &[u8; 32], path: &str) -> bool {
        self.path == path && *blake3::keyed_hash(secret, path.as_bytes()).as_bytes() == self.token
    }

    /// Short hex representation of the token (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.token[..4])
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capability({} {})", self.path, self.short_hex())
    }
}
