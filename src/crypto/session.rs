//! crypto/session.rs
//! Session-scoped key material: a non-exportable AES-256-GCM key plus
//! the salt it was derived from.
//!
//! Design notes:
//! - The raw key bytes live only inside the cipher object; nothing in
//!   the public API returns them, and `Debug` redacts them.
//! - Created once per session and passed by reference into the stream
//!   coordinator. No module-level singletons.

use std::fmt;

use aes_gcm::{Aes256Gcm, KeyInit};

use crate::crypto::kdf::derive_key_256;
use crate::crypto::types::{CryptoError, KEY_LEN_32, SALT_LEN_16};

/// Derived key plus the per-session salt. Lives for the session; never
/// persisted; never logged.
pub struct SessionKeyMaterial {
    cipher: Aes256Gcm,
    salt: [u8; SALT_LEN_16],
}

impl SessionKeyMaterial {
    /// Derive session key material from a passphrase and random salt.
    /// A failure here is fatal for the whole session: no stream may run
    /// without key material.
    pub fn derive(passphrase: &str, salt: [u8; SALT_LEN_16]) -> Result<Self, CryptoError> {
        let key = derive_key_256(passphrase, &salt)?;
        let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| CryptoError::InvalidKeyLen {
            expected: KEY_LEN_32,
            actual: key.len(),
        })?;
        Ok(Self { cipher, salt })
    }

    /// The public per-session salt.
    pub fn salt(&self) -> &[u8; SALT_LEN_16] {
        &self.salt
    }

    pub(crate) fn cipher(&self) -> &Aes256Gcm {
        &self.cipher
    }
}

impl fmt::Debug for SessionKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeyMaterial")
            .field("key", &"<redacted>")
            .field("salt", &hex::encode(self.salt))
            .finish()
    }
}
