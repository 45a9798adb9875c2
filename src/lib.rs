//! sealed-stream
//!
//! Bounded-memory streaming encryption pipeline with adaptive
//! backpressure: chunked iteration, per-item and per-chunk memory
//! pressure gates, cleanup mitigation, cooperative yields, and
//! progress/statistics aggregation over an AES-256-GCM cipher service.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod record;
pub mod types;

// Capabilities and services
pub mod cleanup;
pub mod crypto;
pub mod logging;
pub mod memory;
pub mod telemetry;

// Processing loop
pub mod processor;
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::cleanup::{CleanupRegistry, ReclaimHint};
    pub use crate::crypto::{generate_salt, CipherService, SessionKeyMaterial};
    pub use crate::logging::Logger;
    pub use crate::memory::{MemoryMonitor, MemoryReading, MemorySampler, SysinfoSampler};
    pub use crate::processor::RecordProcessor;
    pub use crate::record::{EncryptedRecord, Record};
    pub use crate::stream::{validate_stream_params, CoordinatorState, StreamCoordinator};
    pub use crate::telemetry::{PipelineSnapshot, ProgressEvent};
    pub use crate::types::{ErrorKind, ErrorReport, StreamError};
}
