//! memory/sampler.rs
//! Memory usage sampling as an injected capability.
//!
//! Design notes:
//! - `sample()` never fails: a host without memory introspection yields
//!   `MemoryReading::Unavailable` rather than an error.
//! - Snapshots are recomputed on each sample and never mutated.
//! - The trait boundary enables deterministic testing via fake samplers.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde::Serialize;
use sysinfo::System;

/// Point-in-time memory usage. Percentage = used / limit * 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MemorySnapshot {
    pub used_bytes: u64,
    pub limit_bytes: u64,
    pub percent_used: f64,
}

impl MemorySnapshot {
    /// Build a snapshot from raw counters. A zero limit is meaningless
    /// and maps to 0% rather than a division by zero.
    pub fn from_parts(used_bytes: u64, limit_bytes: u64) -> Self {
        let percent_used = if limit_bytes > 0 {
            used_bytes as f64 / limit_bytes as f64 * 100.0
        } else {
            0.0
        };
        Self {
            used_bytes,
            limit_bytes,
            percent_used,
        }
    }

    pub fn used_mb(&self) -> f64 {
        self.used_bytes as f64 / (1024.0 * 1024.0)
    }

    pub fn limit_mb(&self) -> f64 {
        self.limit_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Result of one sample: a snapshot, or the explicit sentinel when the
/// host exposes no memory counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MemoryReading {
    Available(MemorySnapshot),
    Unavailable,
}

impl MemoryReading {
    /// True when usage is above `threshold_pct`. An unavailable reading
    /// never reports pressure.
    pub fn exceeds(&self, threshold_pct: f64) -> bool {
        match self {
            MemoryReading::Available(snap) => snap.percent_used > threshold_pct,
            MemoryReading::Unavailable => false,
        }
    }

    pub fn snapshot(&self) -> Option<&MemorySnapshot> {
        match self {
            MemoryReading::Available(snap) => Some(snap),
            MemoryReading::Unavailable => None,
        }
    }
}

/// Injected memory-introspection capability. Pure query, no pipeline
/// state mutation.
pub trait MemorySampler: Send + Sync {
    fn sample(&self) -> MemoryReading;
}

/// Real sampler backed by host memory counters.
pub struct SysinfoSampler {
    // refresh_memory needs &mut System; the trait takes &self.
    sys: Mutex<System>,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        Self {
            sys: Mutex::new(System::new()),
        }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySampler for SysinfoSampler {
    fn sample(&self) -> MemoryReading {
        let mut sys = match self.sys.lock() {
            Ok(sys) => sys,
            Err(_) => return MemoryReading::Unavailable,
        };
        sys.refresh_memory();
        let used = sys.used_memory();
        let limit = sys.total_memory();
        if limit == 0 {
            return MemoryReading::Unavailable;
        }
        MemoryReading::Available(MemorySnapshot::from_parts(used, limit))
    }
}

/// Fake sampler returning the same reading on every call.
pub struct FixedSampler {
    reading: MemoryReading,
}

impl FixedSampler {
    pub fn new(reading: MemoryReading) -> Self {
        Self { reading }
    }

    /// Fixed percentage against a 1 GiB synthetic limit.
    pub fn at_percent(percent: f64) -> Self {
        let limit = 1024u64 * 1024 * 1024;
        let used = (limit as f64 * percent / 100.0) as u64;
        Self::new(MemoryReading::Available(MemorySnapshot::from_parts(
            used, limit,
        )))
    }

    pub fn unavailable() -> Self {
        Self::new(MemoryReading::Unavailable)
    }
}

impl MemorySampler for FixedSampler {
    fn sample(&self) -> MemoryReading {
        self.reading
    }
}

/// Fake sampler playing back a scripted sequence of readings, then a
/// fallback for every later call. Drives pressure scenarios in tests.
pub struct ScriptedSampler {
    script: Mutex<VecDeque<MemoryReading>>,
    fallback: MemoryReading,
}

impl ScriptedSampler {
    pub fn new(script: Vec<MemoryReading>, fallback: MemoryReading) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
        }
    }

    /// Script of percentages against a 1 GiB synthetic limit, falling
    /// back to `fallback_percent` once exhausted.
    pub fn percents(script: &[f64], fallback_percent: f64) -> Self {
        let limit = 1024u64 * 1024 * 1024;
        let to_reading = |pct: f64| {
            MemoryReading::Available(MemorySnapshot::from_parts(
                (limit as f64 * pct / 100.0) as u64,
                limit,
            ))
        };
        Self::new(
            script.iter().copied().map(to_reading).collect(),
            to_reading(fallback_percent),
        )
    }
}

impl MemorySampler for ScriptedSampler {
    fn sample(&self) -> MemoryReading {
        match self.script.lock() {
            Ok(mut script) => script.pop_front().unwrap_or(self.fallback),
            Err(_) => self.fallback,
        }
    }
}
