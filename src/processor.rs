//! processor.rs
//! Per-item processing loop with memory-pressure-aware gating.
//!
//! Algorithm, applied per item in sequence order:
//! 1. sample memory; above the item threshold, run the cleanup registry
//!    and pause for a fixed backpressure window before continuing;
//! 2. apply the transform; a failing item is logged and omitted from the
//!    results, never aborting the batch (skip-and-continue policy);
//! 3. every 100th completed item, emit a progress event;
//! 4. every 50th completed item, yield to the scheduler so co-scheduled
//!    monitoring work is not starved.
//!
//! The loop is strictly sequential; the yields and pauses are scheduling
//! hints, not synchronization primitives.

use std::sync::Arc;
use std::time::Duration;

use crate::cleanup::CleanupRegistry;
use crate::constants::{ITEM_PRESSURE_PCT, PRESSURE_PAUSE, PROGRESS_INTERVAL, YIELD_INTERVAL};
use crate::logging::Logger;
use crate::memory::MemorySampler;
use crate::telemetry::{timed, PipelineCounters, ProgressEvent, Stage, StageTimes};
use crate::types::StreamError;

/// Results plus telemetry for one `process_with_memory_check` call.
#[derive(Debug)]
pub struct ChunkOutcome<R> {
    /// Successful results in input order; shorter than the input when
    /// items failed.
    pub results: Vec<R>,
    pub counters: PipelineCounters,
    pub stage_times: StageTimes,
}

pub struct RecordProcessor {
    sampler: Arc<dyn MemorySampler>,
    cleanup: Arc<CleanupRegistry>,
    logger: Logger,
    pressure_pct: f64,
    pause: Duration,
}

impl RecordProcessor {
    pub fn new(
        sampler: Arc<dyn MemorySampler>,
        cleanup: Arc<CleanupRegistry>,
        logger: Logger,
    ) -> Self {
        Self {
            sampler,
            cleanup,
            logger,
            pressure_pct: ITEM_PRESSURE_PCT,
            pause: PRESSURE_PAUSE,
        }
    }

    /// Override the backpressure pause (tests shorten it to keep
    /// pressure scenarios fast).
    pub fn with_pressure_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Override the item-level pressure threshold.
    pub fn with_pressure_threshold(mut self, percent: f64) -> Self {
        self.pressure_pct = percent;
        self
    }

    /// Process `items` in order with memory gating.
    ///
    /// `offset` is the position of `items[0]` in the original sequence;
    /// the transform receives global indices and progress events report
    /// against `grand_total`. Standalone callers pass `offset = 0` and
    /// `grand_total = items.len()`.
    pub fn process_with_memory_check<T, R, F>(
        &self,
        items: &[T],
        offset: usize,
        grand_total: usize,
        transform: &mut F,
        mut on_progress: Option<&mut dyn FnMut(ProgressEvent)>,
    ) -> ChunkOutcome<R>
    where
        F: FnMut(&T, usize) -> Result<R, StreamError>,
    {
        let mut results = Vec::with_capacity(items.len());
        let mut counters = PipelineCounters::default();
        let mut stage_times = StageTimes::default();

        for (i, item) in items.iter().enumerate() {
            let index = offset + i;

            // 1. Pressure gate before the transform.
            let reading = timed(&mut stage_times, Stage::Sample, || self.sampler.sample());
            if reading.exceeds(self.pressure_pct) {
                let pct = reading.snapshot().map(|s| s.percent_used).unwrap_or(0.0);
                self.logger.warn(format!(
                    "memory pressure at {pct:.1}%, running cleanup before item {index}"
                ));
                timed(&mut stage_times, Stage::Cleanup, || {
                    self.cleanup.run_all(&self.logger)
                });
                counters.cleanup_runs += 1;

                // Deliberate backpressure pause, not an error: give the
                // host a window to reclaim memory.
                timed(&mut stage_times, Stage::Pause, || {
                    std::thread::sleep(self.pause)
                });
                counters.pressure_pauses += 1;
            }

            // 2. Transform; failures are logged and skipped.
            let outcome = timed(&mut stage_times, Stage::Transform, || {
                transform(item, index)
            });
            match outcome {
                Ok(result) => {
                    results.push(result);
                    counters.add_ok();
                }
                Err(e) => {
                    counters.add_failed();
                    self.logger.error(format!("item {index} failed: {e}"));
                }
            }

            // 3. Fine-grained progress every Nth completed item.
            if (i + 1) % PROGRESS_INTERVAL == 0 {
                if let Some(cb) = on_progress.as_mut() {
                    cb(ProgressEvent::items(offset + i + 1, grand_total));
                    counters.progress_events += 1;
                }
            }

            // 4. Cooperative yield every Nth completed item.
            if (i + 1) % YIELD_INTERVAL == 0 {
                std::thread::yield_now();
                counters.yields += 1;
            }
        }

        ChunkOutcome {
            results,
            counters,
            stage_times,
        }
    }
}
