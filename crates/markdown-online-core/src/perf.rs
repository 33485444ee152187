//! Timing helpers for instrumentation.
//!
//! `web_time::Instant` maps to `Performance.now()` on wasm and to
//! `std::time::Instant` elsewhere, so the same code runs in the browser and in
//! native tests.

use web_time::Instant;

/// Run `f` and log how long it took at debug level.
pub fn measure<T, F: FnOnce() -> T>(label: &str, f: F) -> T {
    let start = Instant::now();
    let result = f();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    tracing::debug!(elapsed_ms, "{}", label);
    result
}

/// Logs elapsed time when dropped.
pub struct TimingGuard {
    label: &'static str,
    start: Instant,
}

impl TimingGuard {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(elapsed_ms, "{}", self.label);
    }
}
