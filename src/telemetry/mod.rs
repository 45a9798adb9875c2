//! telemetry/mod.rs
//! Unified telemetry: mutable counters, stage timers, immutable
//! snapshots, and progress events.
//!
//! Notes:
//! - Counters are mutated only by the sequential loop and merged across
//!   chunk boundaries; the snapshot taken at completion is immutable.
//! - Progress events are purely informational and carry no side effects
//!   back into the pipeline.

pub mod counters;
pub mod progress;
pub mod snapshot;
pub mod timers;

pub use counters::*;
pub use progress::*;
pub use snapshot::*;
pub use timers::*;
