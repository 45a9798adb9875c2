//! telemetry/counters.rs
//! Mutable counters collected during stream processing.
//!
//! Summary: the processor fills a fresh set per chunk; the coordinator
//! merges them across chunk boundaries and converts the total into an
//! immutable snapshot at completion.

use serde::Serialize;

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PipelineCounters {
    pub items_ok: u64,
    pub items_failed: u64,
    pub chunks_completed: u64,
    pub cleanup_runs: u64,
    pub pressure_pauses: u64,
    pub progress_events: u64,
    pub yields: u64,
}

impl PipelineCounters {
    /// Record one successfully transformed item.
    pub fn add_ok(&mut self) {
        self.items_ok += 1;
    }

    /// Record one skipped item (transform failure).
    pub fn add_failed(&mut self) {
        self.items_failed += 1;
    }

    /// Items seen so far, successful or not.
    pub fn items_total(&self) -> u64 {
        self.items_ok + self.items_failed
    }

    // Merging chunk counters into the stream total avoids sharing
    // mutable state between the processor and the coordinator.
    pub fn merge(&mut self, other: &PipelineCounters) {
        self.items_ok += other.items_ok;
        self.items_failed += other.items_failed;
        self.chunks_completed += other.chunks_completed;
        self.cleanup_runs += other.cleanup_runs;
        self.pressure_pauses += other.pressure_pauses;
        self.progress_events += other.progress_events;
        self.yields += other.yields;
    }
}
