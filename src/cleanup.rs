//! cleanup.rs
//! Registry of mitigation callbacks invoked on memory pressure.
//!
//! Design notes:
//! - Append-only registration, no dedup; callbacks run in registration
//!   order.
//! - Each invocation is isolated: a failing callback is logged as a
//!   warning and the next one still runs. Failures never escalate past
//!   the registry boundary.
//! - After all callbacks settle, an optional host reclaim hint fires as
//!   a best-effort call. The default hint is a no-op, which is the valid
//!   behavior for hosts without a manual reclaim facility.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::logging::Logger;

/// Zero-argument mitigation action consumed for side effect only.
pub type CleanupCallback = Box<dyn FnMut() -> Result<(), String> + Send>;

/// Optional host capability: hint that now is a good moment to reclaim
/// memory. Absence of the facility is a silent no-op.
pub trait ReclaimHint: Send + Sync {
    fn reclaim(&self) {}
}

/// Default hint for hosts without a manual reclaim facility.
pub struct NoopReclaim;

impl ReclaimHint for NoopReclaim {}

pub struct CleanupRegistry {
    // Mutex only because the registry is shared behind an Arc between
    // the item-level and chunk-level pressure checks; the core loop is
    // single-threaded-equivalent, so there is never contention.
    callbacks: Mutex<Vec<CleanupCallback>>,
    reclaim: Box<dyn ReclaimHint>,
    runs: AtomicU64,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self::with_reclaim_hint(Box::new(NoopReclaim))
    }

    pub fn with_reclaim_hint(reclaim: Box<dyn ReclaimHint>) -> Self {
        Self {
            callbacks: Mutex::new(Vec::new()),
            reclaim,
            runs: AtomicU64::new(0),
        }
    }

    /// Append a callback. No dedup: registering twice runs twice.
    pub fn register(&self, callback: CleanupCallback) {
        if let Ok(mut callbacks) = self.callbacks.lock() {
            callbacks.push(callback);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of `run_all` invocations so far.
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    /// Invoke every registered callback in order, then the reclaim hint.
    /// Returns the number of callbacks that failed; the count is for
    /// telemetry only and failures never abort the batch.
    pub fn run_all(&self, logger: &Logger) -> usize {
        self.runs.fetch_add(1, Ordering::Relaxed);
        let mut failed = 0usize;

        if let Ok(mut callbacks) = self.callbacks.lock() {
            for (index, callback) in callbacks.iter_mut().enumerate() {
                if let Err(reason) = callback() {
                    failed += 1;
                    logger.warn(format!("cleanup callback {index} failed: {reason}"));
                }
            }
        }

        self.reclaim.reclaim();
        failed
    }
}

impl Default for CleanupRegistry {
    fn default() -> Self {
        Self::new()
    }
}
