//! Time sources for the vignette engine
//!
//! All animation state in NaviCue is a pure function of elapsed time, so the
//! only thing a driver needs from the outside world is "how many milliseconds
//! have passed". [`MonotonicClock`] wraps [`Instant`] for live playback;
//! [`ManualClock`] lets tests and headless playback advance time explicitly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A monotonic source of elapsed milliseconds
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since the clock's origin
    fn now_ms(&self) -> f64;
}

/// Shared clock handle for passing one time source to several drivers
pub type SharedClock = Arc<dyn Clock>;

/// Wall-clock time via [`Instant`], origin at construction
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to
///
/// Cheap to clone; clones share the same timeline. Time is stored as integer
/// microseconds so concurrent readers never observe a torn value.
#[derive(Clone)]
pub struct ManualClock {
    micros: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            micros: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Advance the clock by `dt_ms` milliseconds
    pub fn advance(&self, dt_ms: f64) {
        let dt_us = (dt_ms * 1000.0).round().max(0.0) as u64;
        self.micros.fetch_add(dt_us, Ordering::SeqCst);
    }

    /// Jump the clock to an absolute time in milliseconds
    pub fn set(&self, now_ms: f64) {
        let us = (now_ms * 1000.0).round().max(0.0) as u64;
        self.micros.store(us, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.micros.load(Ordering::SeqCst) as f64 / 1000.0
    }
}
