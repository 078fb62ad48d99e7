//! Clock abstraction for window aging.
//!
//! Spike detection ages its window against *processing* time, never against
//! event timestamps, so back-dated events cannot purge fresher entries. The
//! trait seam lets tests pin time with `VirtualClock`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "now" in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_millis() as u64
    }
}

/// Manually advanced clock for deterministic tests.
#[derive(Clone, Debug)]
pub struct VirtualClock {
    offset_ms: Arc<AtomicU64>,
}

impl VirtualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            offset_ms: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.offset_ms.fetch_add(ms, Ordering::Release);
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.offset_ms.load(Ordering::Acquire)
    }
}
