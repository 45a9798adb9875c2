//! crypto/kdf.rs
//! PBKDF2-based key derivation from a session passphrase and random salt.
//!
//! Design:
//! - PBKDF2-HMAC-SHA256, 100,000 iterations, 32-byte output.
//! - Deterministic for a given (passphrase, salt) pair.
//! - Salt must be random per session. All-zero salts are rejected before
//!   derivation.
//!
//! Security notes:
//! - The derived key is handed straight to the AEAD cipher and never
//!   stored or logged as raw bytes (see `session.rs`).

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::constants::KDF_ITERATIONS;
use crate::crypto::types::{CryptoError, KEY_LEN_32, SALT_LEN_16};

/// Derive a 32-byte AEAD key from a passphrase and 16-byte salt.
///
/// Contract:
/// - `passphrase` must be non-empty.
/// - `salt` must pass `validate_salt`.
/// - Same `(passphrase, salt)` always yields the same key.
pub fn derive_key_256(
    passphrase: &str,
    salt: &[u8; SALT_LEN_16],
) -> Result<[u8; KEY_LEN_32], CryptoError> {
    if passphrase.is_empty() {
        return Err(CryptoError::KeyDerivation(
            "passphrase must not be empty".into(),
        ));
    }
    validate_salt(salt)?;

    let mut key = [0u8; KEY_LEN_32];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, KDF_ITERATIONS, &mut key);
    Ok(key)
}

/// Fresh 16-byte salt from the OS cryptographic random source.
pub fn generate_salt() -> [u8; SALT_LEN_16] {
    let mut salt = [0u8; SALT_LEN_16];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Salt must be random per session; all-zero is forbidden.
#[inline]
pub fn validate_salt(salt: &[u8; SALT_LEN_16]) -> Result<(), CryptoError> {
    if salt.iter().all(|&b| b == 0) {
        return Err(CryptoError::InvalidSalt);
    }
    Ok(())
}
