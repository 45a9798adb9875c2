//! crypto/mod.rs
//! Cipher service: passphrase key derivation, session key material,
//! and per-record authenticated encryption.

pub mod cipher;
pub mod kdf;
pub mod session;
pub mod types;

pub use cipher::*;
pub use kdf::*;
pub use session::*;
pub use types::*;
