/// Lightweight performance instrumentation
///
/// Marks the start and end of a named metric and logs the measured
/// duration. Slow network calls are reported at warn level.

use std::time::{Duration, Instant};

/// Network calls slower than this are logged as warnings
pub const SLOW_RESPONSE: Duration = Duration::from_millis(1000);

#[derive(Debug)]
pub struct Stopwatch {
    metric: String,
    started: Instant,
}

impl Stopwatch {
    /// Mark the start of `metric`
    pub fn start(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Mark the end of the metric and log the measure
    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        tracing::debug!("⏱️  {}: {:.2}ms", self.metric, elapsed.as_secs_f64() * 1000.0);
        elapsed
    }

    /// Like [`Stopwatch::finish`], but warn when the measure exceeds `limit`
    pub fn finish_with_limit(self, limit: Duration) -> Duration {
        let elapsed = self.elapsed();
        if elapsed > limit {
            tracing::warn!("🐢 Slow response for {}: {}ms", self.metric, elapsed.as_millis());
        } else {
            tracing::debug!("⏱️  {}: {:.2}ms", self.metric, elapsed.as_secs_f64() * 1000.0);
        }
        elapsed
    }
}
