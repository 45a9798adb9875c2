//! memory/monitor.rs
//! Background memory monitor on a fixed cadence.
//!
//! Design notes:
//! - Runs outside the processing loop on its own thread and is strictly
//!   read-only with respect to pipeline state: it samples and publishes
//!   the latest reading, nothing else.
//! - `crossbeam` tick channel drives the cadence; a shutdown channel
//!   stops the thread cleanly on `stop()` or drop.

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam::channel::{bounded, select, tick, Sender};

use crate::memory::sampler::{MemoryReading, MemorySampler};

pub struct MemoryMonitor {
    latest: Arc<Mutex<MemoryReading>>,
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl MemoryMonitor {
    /// Spawn the monitor thread, sampling every `interval`.
    pub fn start(sampler: Arc<dyn MemorySampler>, interval: Duration) -> Self {
        let latest = Arc::new(Mutex::new(sampler.sample()));
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let ticker = tick(interval);

        let shared = Arc::clone(&latest);
        let handle = std::thread::spawn(move || loop {
            select! {
                recv(ticker) -> _ => {
                    let reading = sampler.sample();
                    if let Ok(mut slot) = shared.lock() {
                        *slot = reading;
                    }
                }
                recv(stop_rx) -> _ => break,
            }
        });

        Self {
            latest,
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Most recent reading published by the monitor thread.
    pub fn latest(&self) -> MemoryReading {
        self.latest
            .lock()
            .map(|slot| *slot)
            .unwrap_or(MemoryReading::Unavailable)
    }

    /// Stop the monitor thread and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.stop_tx.send(());
            let _ = handle.join();
        }
    }
}

impl Drop for MemoryMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
