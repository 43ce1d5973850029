//! Request counters for operational tooling.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;

/// Snapshot of request counters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    /// Running mean over every recorded request, in milliseconds.
    pub average_response_time_ms: f64,
}

/// Thread-safe accumulator of [`Metrics`].
#[derive(Debug, Default)]
pub struct MetricsCollector {
    inner: Mutex<Metrics>,
}

impl MetricsCollector {
    /// Create a collector with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Metrics> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count one request and fold `elapsed` into the running mean.
    pub fn record_request(&self, success: bool, elapsed: Duration) {
        let mut metrics = self.lock();
        metrics.total_requests += 1;
        if success {
            metrics.successful_requests += 1;
        } else {
            metrics.failed_requests += 1;
        }
        let n = metrics.total_requests as f64;
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        metrics.average_response_time_ms =
            (metrics.average_response_time_ms * (n - 1.0) + elapsed_ms) / n;
    }

    /// Copy of the current counters.
    #[must_use]
    pub fn metrics(&self) -> Metrics {
        *self.lock()
    }

    /// Zero every counter.
    pub fn reset(&self) {
        *self.lock() = Metrics::default();
    }
}
