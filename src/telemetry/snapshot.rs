//! telemetry/snapshot.rs
//! Immutable statistics snapshot taken when a stream completes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::PipelineCounters;
use crate::telemetry::timers::{PipelineTimer, StageTimes};

/// Final stream statistics: counters, stage timings, elapsed wall time,
/// and item throughput.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSnapshot {
    pub items_ok: u64,
    pub items_failed: u64,
    pub chunks_completed: u64,
    pub cleanup_runs: u64,
    pub pressure_pauses: u64,
    pub elapsed: Duration,
    pub throughput_items_per_sec: f64,
    pub stage_times: StageTimes,
}

impl PipelineSnapshot {
    pub fn from(
        counters: &PipelineCounters,
        timer: &PipelineTimer,
        stage_times: StageTimes,
    ) -> Self {
        let elapsed = timer.elapsed();
        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.items_ok as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            items_ok: counters.items_ok,
            items_failed: counters.items_failed,
            chunks_completed: counters.chunks_completed,
            cleanup_runs: counters.cleanup_runs,
            pressure_pauses: counters.pressure_pauses,
            elapsed,
            throughput_items_per_sec: throughput,
            stage_times,
        }
    }

    pub fn items_total(&self) -> u64 {
        self.items_ok + self.items_failed
    }

    /// Internal invariants: stage time fits inside elapsed time and the
    /// item totals are consistent.
    pub fn sanity_check(&self) -> bool {
        self.stage_times.total() <= self.elapsed + Duration::from_millis(1)
            && self.items_total() >= self.items_ok
    }
}
