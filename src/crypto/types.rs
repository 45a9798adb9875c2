//! crypto/types.rs
//! Stable key, salt, and nonce sizes plus the crypto error taxonomy.

use thiserror::Error;

/// AES-256 key length (bytes).
pub const KEY_LEN_32: usize = 32;

/// Standard 12-byte nonce length for AES-GCM.
pub const NONCE_LEN_12: usize = 12;

/// Fixed AEAD tag length (bytes).
pub const TAG_LEN: usize = 16;

/// Per-session random salt length (bytes).
pub const SALT_LEN_16: usize = 16;

#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key derivation rejected its inputs (e.g. empty passphrase).
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Salt is invalid (all zeros).
    #[error("invalid salt: all zeros")]
    InvalidSalt,

    /// Invalid key length provided to the cipher.
    #[error("invalid key length: expected={expected}, actual={actual}")]
    InvalidKeyLen { expected: usize, actual: usize },

    /// AEAD seal failure.
    #[error("AES-GCM seal failed: {0}")]
    SealFailure(String),

    /// AEAD tag mismatch (authentication failure on open).
    #[error("AEAD tag mismatch")]
    TagMismatch,

    /// Wire payload is malformed (too short, bad base64).
    #[error("malformed sealed payload: {0}")]
    MalformedPayload(String),

    /// Record could not be serialized into the canonical plaintext.
    #[error("record serialization failed: {0}")]
    Serialize(String),
}
