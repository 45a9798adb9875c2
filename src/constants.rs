//! constants.rs
//! Pipeline-wide tuning constants: KDF parameters, pressure thresholds,
//! loop cadences, and dataset bounds.

use std::time::Duration;

/// PBKDF2 iteration count for passphrase-based key derivation.
/// Fixed per session; decrypting a record requires the same count.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Algorithm tag stamped into every encrypted record.
pub const ALGORITHM_TAG: &str = "AES-256-GCM";

/// Item-level memory pressure threshold (percent of limit).
/// Crossing it triggers cleanup plus a backpressure pause before the item.
pub const ITEM_PRESSURE_PCT: f64 = 70.0;

/// Chunk-level memory pressure threshold (percent of limit).
/// Stricter than the item-level gate; checked once per completed chunk.
pub const CHUNK_PRESSURE_PCT: f64 = 75.0;

/// Fixed pause after a pressure-triggered cleanup, giving the host a
/// window to reclaim memory before processing resumes.
pub const PRESSURE_PAUSE: Duration = Duration::from_millis(100);

/// Emit a fine-grained progress event every Nth completed item.
pub const PROGRESS_INTERVAL: usize = 100;

/// Cooperatively yield to the scheduler every Nth completed item.
pub const YIELD_INTERVAL: usize = 50;

/// Cadence of the background memory monitor.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Dataset size bounds accepted by the coordinator.
pub const MIN_DATASET_LEN: usize = 500;
pub const MAX_DATASET_LEN: usize = 100_000;

/// Recommended chunk size range. Not enforced: validation only requires
/// a positive chunk size no larger than the dataset.
pub const RECOMMENDED_CHUNK_MIN: usize = 500;
pub const RECOMMENDED_CHUNK_MAX: usize = 2_000;

/// Default chunk size when the caller has no preference.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000;
