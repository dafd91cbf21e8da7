//! Wall-clock timing helpers
//!
//! `now()` exposes a monotonic clock as fractional seconds; `Stopwatch`
//! accumulates elapsed time and can be paused so that progress output stays
//! out of a measurement.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Monotonic timestamp in fractional seconds since the first call in this process
pub fn now() -> f64 {
    let epoch = *EPOCH.get_or_init(Instant::now);
    epoch.elapsed().as_secs_f64()
}

/// Milliseconds between two `now()` samples
pub fn elapsed_ms(start: f64, end: f64) -> f64 {
    ((end - start) * 1000.0).max(0.0)
}

/// Accumulating stopwatch
#[derive(Debug, Clone)]
pub struct Stopwatch {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl Stopwatch {
    /// Create a stopwatch that is already running
    pub fn start() -> Self {
        Self {
            accumulated: Duration::ZERO,
            running_since: Some(Instant::now()),
        }
    }

    /// Stop accumulating time; no-op when already paused
    pub fn pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    /// Continue accumulating time; no-op when already running
    pub fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Total time spent running so far
    pub fn elapsed(&self) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + since.elapsed(),
            None => self.accumulated,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }

    /// Pause for the duration of `f`
    pub fn paused<T>(&mut self, f: impl FnOnce() -> T) -> T {
        let was_running = self.is_running();
        self.pause();
        let value = f();
        if was_running {
            self.resume();
        }
        value
    }
}

/// Run `f` and return its value with the elapsed milliseconds
pub fn time_ms<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let watch = Stopwatch::start();
    let value = f();
    (value, watch.elapsed_ms())
}
