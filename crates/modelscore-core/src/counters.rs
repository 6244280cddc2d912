//! Process-wide atomic counters.
//!
//! Counters are incremented silently at the call site. Call
//! [`Counters::flush`] to emit current values as a single
//! `tracing::info!` event at the end of a run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global counters singleton.
pub static COUNTERS: Counters = Counters::new();

/// Lightweight atomic counters, no allocations and no locking.
pub struct Counters {
    subjects_evaluated: AtomicU64,
    subjects_skipped: AtomicU64,
    metrics_run: AtomicU64,
    metric_failures: AtomicU64,
}

impl Default for Counters {
    fn default() -> Self {
        Self::new()
    }
}

impl Counters {
    pub const fn new() -> Self {
        Self {
            subjects_evaluated: AtomicU64::new(0),
            subjects_skipped: AtomicU64::new(0),
            metrics_run: AtomicU64::new(0),
            metric_failures: AtomicU64::new(0),
        }
    }

    pub fn inc_subjects_evaluated(&self) {
        self.subjects_evaluated.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "subjects_evaluated", "counter incremented");
    }

    pub fn inc_subjects_skipped(&self) {
        self.subjects_skipped.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "subjects_skipped", "counter incremented");
    }

    /// Counts every runner invocation, failed or not.
    pub fn inc_metrics_run(&self) {
        self.metrics_run.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "metrics_run", "counter incremented");
    }

    pub fn inc_metric_failures(&self) {
        self.metric_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "metric_failures", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            counter = "flush",
            subjects_evaluated = self.subjects_evaluated(),
            subjects_skipped = self.subjects_skipped(),
            metrics_run = self.metrics_run(),
            metric_failures = self.metric_failures(),
        );
    }

    pub fn subjects_evaluated(&self) -> u64 {
        self.subjects_evaluated.load(Ordering::Relaxed)
    }

    pub fn subjects_skipped(&self) -> u64 {
        self.subjects_skipped.load(Ordering::Relaxed)
    }

    pub fn metrics_run(&self) -> u64 {
        self.metrics_run.load(Ordering::Relaxed)
    }

    pub fn metric_failures(&self) -> u64 {
        self.metric_failures.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.subjects_evaluated.store(0, Ordering::Relaxed);
        self.subjects_skipped.store(0, Ordering::Relaxed);
        self.metrics_run.store(0, Ordering::Relaxed);
        self.metric_failures.store(0, Ordering::Relaxed);
    }
}
