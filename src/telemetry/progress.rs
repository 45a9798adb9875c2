//! telemetry/progress.rs
//! Progress events emitted on a cadence: every Nth item and once per
//! completed chunk. Purely informational.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub processed: usize,
    pub total: usize,
    pub percentage: f64,
    pub current_chunk: Option<usize>,
    pub total_chunks: Option<usize>,
}

impl ProgressEvent {
    /// Fine-grained item progress, no chunk context.
    pub fn items(processed: usize, total: usize) -> Self {
        Self {
            processed,
            total,
            percentage: percentage(processed, total),
            current_chunk: None,
            total_chunks: None,
        }
    }

    /// Chunk-level progress. `current_chunk` is 1-based for display.
    pub fn chunked(
        processed: usize,
        total: usize,
        current_chunk: usize,
        total_chunks: usize,
    ) -> Self {
        Self {
            processed,
            total,
            percentage: percentage(processed, total),
            current_chunk: Some(current_chunk),
            total_chunks: Some(total_chunks),
        }
    }
}

fn percentage(processed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        processed as f64 / total as f64 * 100.0
    }
}
