//! crypto/cipher.rs
//! Per-record authenticated encryption over session key material.
//!
//! Design notes:
//! - Plaintext is the canonical serde_json form of the record with the
//!   record id and a seal timestamp injected at encryption time.
//! - A fresh random nonce is generated inline on every seal call and is
//!   never cached, so nonce reuse under the session key is structurally
//!   prevented.
//! - Wire format: `nonce (12 bytes) || ciphertext || tag (16 bytes)`,
//!   base64-encoded for transport and display.

use aes_gcm::aead::Aead;
use aes_gcm::Nonce;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::constants::ALGORITHM_TAG;
use crate::crypto::session::SessionKeyMaterial;
use crate::crypto::types::{CryptoError, NONCE_LEN_12, SALT_LEN_16, TAG_LEN};
use crate::record::{EncryptedRecord, Record};
use crate::types::StreamError;

/// Canonical plaintext: the record plus id and timestamp injected at
/// encryption time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealedPayload {
    pub id: u64,
    pub sealed_at: DateTime<Utc>,
    pub record: Record,
}

/// Session-scoped cipher service. One instance per session, passed by
/// reference into the pipeline.
#[derive(Debug)]
pub struct CipherService {
    session: SessionKeyMaterial,
}

impl CipherService {
    pub fn new(session: SessionKeyMaterial) -> Self {
        Self { session }
    }

    /// Convenience constructor: derive key material and wrap it.
    pub fn from_passphrase(
        passphrase: &str,
        salt: [u8; SALT_LEN_16],
    ) -> Result<Self, CryptoError> {
        Ok(Self::new(SessionKeyMaterial::derive(passphrase, salt)?))
    }

    pub fn algorithm(&self) -> &'static str {
        ALGORITHM_TAG
    }

    pub fn session(&self) -> &SessionKeyMaterial {
        &self.session
    }

    /// Encrypt one record. `id` is the record's position in the original
    /// sequence.
    pub fn seal_record(&self, record: &Record, id: u64) -> Result<EncryptedRecord, CryptoError> {
        let sealed_at = Utc::now();
        let payload = SealedPayload {
            id,
            sealed_at,
            record: record.clone(),
        };
        let plaintext =
            serde_json::to_vec(&payload).map_err(|e| CryptoError::Serialize(e.to_string()))?;

        // Fresh nonce per call. Generated here and nowhere else.
        let nonce = generate_nonce();
        let ciphertext = self
            .session
            .cipher()
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_ref())
            .map_err(|_| CryptoError::SealFailure("AEAD rejected the payload".into()))?;

        let mut wire = Vec::with_capacity(NONCE_LEN_12 + ciphertext.len());
        wire.extend_from_slice(&nonce);
        wire.extend_from_slice(&ciphertext);

        Ok(EncryptedRecord {
            id,
            original_len: plaintext.len(),
            payload_b64: STANDARD.encode(&wire),
            nonce,
            sealed_at,
            algorithm: ALGORITHM_TAG,
            ok: true,
        })
    }

    /// Decrypt and authenticate one sealed record, returning the
    /// canonical payload. Verification path for round-trips.
    pub fn open_record(&self, sealed: &EncryptedRecord) -> Result<SealedPayload, CryptoError> {
        let wire = STANDARD
            .decode(&sealed.payload_b64)
            .map_err(|e| CryptoError::MalformedPayload(e.to_string()))?;
        if wire.len() < NONCE_LEN_12 + TAG_LEN {
            return Err(CryptoError::MalformedPayload(format!(
                "payload too short: {} bytes",
                wire.len()
            )));
        }

        let (nonce, ciphertext) = wire.split_at(NONCE_LEN_12);
        let plaintext = self
            .session
            .cipher()
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::TagMismatch)?;

        serde_json::from_slice(&plaintext).map_err(|e| CryptoError::MalformedPayload(e.to_string()))
    }

    /// Transform closure for the pipeline: seals each record under this
    /// session, stamping the global sequence index as the record id.
    pub fn sealing_transform(
        &self,
    ) -> impl FnMut(&Record, usize) -> Result<EncryptedRecord, StreamError> + '_ {
        move |record, index| {
            self.seal_record(record, index as u64)
                .map_err(StreamError::Crypto)
        }
    }
}

/// Fresh 12-byte nonce from the OS cryptographic random source.
/// Private on purpose: callers cannot supply or cache nonces.
fn generate_nonce() -> [u8; NONCE_LEN_12] {
    let mut nonce = [0u8; NONCE_LEN_12];
    OsRng.fill_bytes(&mut nonce);
    nonce
}
