//! stream.rs
//! Chunked stream coordination over the record processor.
//!
//! Design notes:
//! - Splits the dataset into contiguous fixed-size chunks (the last may
//!   be shorter) and drives the processor per chunk, strictly in order.
//! - Chunk boundaries never split a record, and order across chunks is
//!   preserved in the aggregated results.
//! - Between chunks a stricter pressure threshold applies; the chunk's
//!   transient storage is dropped before the check so the host can
//!   actually reclaim it.
//! - State machine: Idle -> Running(chunk 0..N-1) -> Completed. There is
//!   no Failed terminal state: item failures are absorbed inside the
//!   processor, and only pre-flight validation can reject a stream.

use std::sync::Arc;

use crate::cleanup::CleanupRegistry;
use crate::constants::{CHUNK_PRESSURE_PCT, MAX_DATASET_LEN, MIN_DATASET_LEN};
use crate::logging::Logger;
use crate::memory::MemorySampler;
use crate::processor::RecordProcessor;
use crate::telemetry::{PipelineCounters, PipelineSnapshot, PipelineTimer, ProgressEvent, StageTimes};
use crate::types::StreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Running { chunk: usize },
    Completed,
}

/// Reject invalid configuration before any processing starts.
pub fn validate_stream_params(dataset_len: usize, chunk_size: usize) -> Result<(), StreamError> {
    if chunk_size == 0 {
        return Err(StreamError::Validation(
            "chunk size must be positive".into(),
        ));
    }
    if dataset_len < MIN_DATASET_LEN || dataset_len > MAX_DATASET_LEN {
        return Err(StreamError::Validation(format!(
            "dataset size {dataset_len} out of bounds ({MIN_DATASET_LEN}..={MAX_DATASET_LEN})"
        )));
    }
    if chunk_size > dataset_len {
        return Err(StreamError::Validation(format!(
            "chunk size {chunk_size} exceeds dataset size {dataset_len}"
        )));
    }
    Ok(())
}

pub struct StreamCoordinator {
    chunk_size: usize,
    processor: RecordProcessor,
    sampler: Arc<dyn MemorySampler>,
    cleanup: Arc<CleanupRegistry>,
    logger: Logger,
    state: CoordinatorState,
    counters: PipelineCounters,
    snapshot: Option<PipelineSnapshot>,
}

impl StreamCoordinator {
    pub fn new(
        chunk_size: usize,
        sampler: Arc<dyn MemorySampler>,
        cleanup: Arc<CleanupRegistry>,
        logger: Logger,
    ) -> Self {
        let processor =
            RecordProcessor::new(Arc::clone(&sampler), Arc::clone(&cleanup), logger.clone());
        Self {
            chunk_size,
            processor,
            sampler,
            cleanup,
            logger,
            state: CoordinatorState::Idle,
            counters: PipelineCounters::default(),
            snapshot: None,
        }
    }

    /// Replace the default processor (tests shorten the backpressure
    /// pause this way).
    pub fn with_processor(mut self, processor: RecordProcessor) -> Self {
        self.processor = processor;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    /// Counters aggregated so far.
    pub fn counters(&self) -> &PipelineCounters {
        &self.counters
    }

    /// Final statistics, available once the stream has completed.
    pub fn snapshot(&self) -> Option<&PipelineSnapshot> {
        self.snapshot.as_ref()
    }

    /// Process the whole dataset in chunks, sequentially.
    ///
    /// Consumes `data` so each chunk's storage can be released as soon
    /// as the chunk is done. Per chunk: delegate to the processor, call
    /// `on_chunk` with `(chunk_results, chunk_index, total_chunks)`,
    /// drop the chunk buffer, apply the stricter chunk-level pressure
    /// check, then emit a chunk-level progress event.
    pub fn process_stream<T, R, F>(
        &mut self,
        mut data: Vec<T>,
        mut transform: F,
        mut on_chunk: Option<&mut dyn FnMut(&[R], usize, usize)>,
        mut on_progress: Option<&mut dyn FnMut(ProgressEvent)>,
    ) -> Result<Vec<R>, StreamError>
    where
        F: FnMut(&T, usize) -> Result<R, StreamError>,
    {
        validate_stream_params(data.len(), self.chunk_size)?;

        let total = data.len();
        let total_chunks = (total + self.chunk_size - 1) / self.chunk_size;
        let mut timer = PipelineTimer::new();
        let mut stage_times = StageTimes::default();
        self.counters = PipelineCounters::default();
        self.snapshot = None;

        self.logger.info(format!(
            "stream started: {total} records in {total_chunks} chunks of up to {}",
            self.chunk_size
        ));

        let mut results: Vec<R> = Vec::with_capacity(total);
        let mut processed = 0usize;

        for chunk_index in 0..total_chunks {
            self.state = CoordinatorState::Running { chunk: chunk_index };

            let take = self.chunk_size.min(data.len());
            let chunk: Vec<T> = data.drain(..take).collect();

            // 1. Delegate to the per-item loop; indices stay global.
            let item_progress = on_progress
                .as_mut()
                .map(|cb| &mut **cb as &mut dyn FnMut(ProgressEvent));
            let outcome = self.processor.process_with_memory_check(
                &chunk,
                processed,
                total,
                &mut transform,
                item_progress,
            );
            processed += chunk.len();
            self.counters.merge(&outcome.counters);
            stage_times.merge(&outcome.stage_times);

            // 2. Coordinator-level chunk hook.
            if let Some(cb) = on_chunk.as_mut() {
                cb(&outcome.results, chunk_index, total_chunks);
            }
            results.extend(outcome.results);

            // 3. Release the chunk's transient storage before checking
            //    pressure, so the reading reflects the freed memory.
            drop(chunk);

            // 4. Stricter chunk-level pressure check.
            let reading = self.sampler.sample();
            if reading.exceeds(CHUNK_PRESSURE_PCT) {
                let pct = reading.snapshot().map(|s| s.percent_used).unwrap_or(0.0);
                self.logger.warn(format!(
                    "chunk-level memory pressure at {pct:.1}% after chunk {chunk_index}, running cleanup"
                ));
                self.cleanup.run_all(&self.logger);
                self.counters.cleanup_runs += 1;
            }

            self.counters.chunks_completed += 1;
            self.logger.info(format!(
                "chunk {}/{} completed: {processed}/{total} records",
                chunk_index + 1,
                total_chunks
            ));

            // 5. Chunk-level progress event.
            if let Some(cb) = on_progress.as_mut() {
                cb(ProgressEvent::chunked(
                    processed,
                    total,
                    chunk_index + 1,
                    total_chunks,
                ));
                self.counters.progress_events += 1;
            }
        }

        timer.finish();
        self.state = CoordinatorState::Completed;
        let snapshot = PipelineSnapshot::from(&self.counters, &timer, stage_times);
        self.logger.info(format!(
            "stream completed: {} ok, {} failed, {} chunks, {:.1} items/s",
            snapshot.items_ok,
            snapshot.items_failed,
            snapshot.chunks_completed,
            snapshot.throughput_items_per_sec
        ));
        self.snapshot = Some(snapshot);

        Ok(results)
    }
}
