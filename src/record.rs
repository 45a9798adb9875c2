//! record.rs
//! Input records and their encrypted counterparts.
//!
//! Design notes:
//! - `Record` is immutable once generated; ownership moves from the
//!   dataset into the processing loop.
//! - `EncryptedRecord` is created once per input record and carries the
//!   wire payload as base64 of `nonce || ciphertext || tag`.
//! - `id` always equals the record's position in the original sequence,
//!   even though chunking subdivides the work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Arbitrary structured input item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub label: String,
    pub value: f64,
    pub payload: String,
}

impl Record {
    pub fn new(label: impl Into<String>, value: f64, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
            payload: payload.into(),
        }
    }

    /// Deterministic synthetic record, used by demos and tests to build
    /// datasets of a given size.
    pub fn synthetic(seq: usize) -> Self {
        Self {
            label: format!("record-{seq}"),
            value: seq as f64 * 0.5,
            payload: format!("payload for record {seq}"),
        }
    }
}

/// Output of one successful encryption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncryptedRecord {
    /// Position of the source record in the original sequence.
    pub id: u64,
    /// Serialized plaintext length in bytes.
    pub original_len: usize,
    /// Base64 of `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
    pub payload_b64: String,
    /// The per-call nonce, also present as the payload prefix.
    pub nonce: [u8; 12],
    pub sealed_at: DateTime<Utc>,
    pub algorithm: &'static str,
    pub ok: bool,
}
