//! memory/mod.rs
//! Memory introspection: point-in-time sampling plus a background
//! monitor on a fixed cadence.

pub mod monitor;
pub mod sampler;

pub use monitor::*;
pub use sampler::*;
