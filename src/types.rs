//! types.rs
//! Unified stream error covering validation, crypto, memory, and
//! environment-capability failures.
//!
//! Design notes:
//! - Ergonomic `From<T>` impls enable `?` across the pipeline.
//! - `ErrorKind` + `ErrorReport` give external collaborators a stable
//!   categorized surface: kind, message, and a recovery suggestion.
//! - Per-item transform failures never escape the processing loop; a
//!   `StreamError` surfaces only when the whole operation cannot proceed.

use serde::Serialize;
use thiserror::Error;

use crate::crypto::CryptoError;

/// Stable error categories surfaced to external collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Validation,
    Encryption,
    Memory,
    UnsupportedEnvironment,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Encryption => "encryption",
            ErrorKind::Memory => "memory",
            ErrorKind::UnsupportedEnvironment => "unsupported-environment",
        }
    }
}

/// Unified pipeline error.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Invalid configuration, rejected before any processing starts.
    #[error("validation error: {0}")]
    Validation(String),

    /// Cryptographic failure (KDF, AEAD, serialization of the payload).
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Memory-related failure. Pressure itself is mitigation, not an
    /// error; this variant covers genuine resource exhaustion.
    #[error("memory error: {0}")]
    Memory(String),

    /// Host lacks a required capability for the whole session.
    #[error("unsupported environment: {0}")]
    Unsupported(String),
}

impl StreamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamError::Validation(_) => ErrorKind::Validation,
            StreamError::Crypto(_) => ErrorKind::Encryption,
            StreamError::Memory(_) => ErrorKind::Memory,
            StreamError::Unsupported(_) => ErrorKind::UnsupportedEnvironment,
        }
    }

    /// Short recovery hint matching the error category.
    pub fn suggestion(&self) -> &'static str {
        match self {
            StreamError::Validation(_) => {
                "check dataset size and chunk size before starting the stream"
            }
            StreamError::Crypto(_) => {
                "verify the passphrase and retry; the session key may be missing"
            }
            StreamError::Memory(_) => {
                "reduce the chunk size or register cleanup callbacks to free memory"
            }
            StreamError::Unsupported(_) => {
                "run on a host that exposes the required cryptographic capability"
            }
        }
    }

    /// Categorized error object for external consumers.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind().as_str(),
            message: self.to_string(),
            suggestion: self.suggestion(),
        }
    }
}

/// User-visible error surface: `{kind, message, suggestion}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: &'static str,
    pub message: String,
    pub suggestion: &'static str,
}
