//! Metrics for estimate requests.

use metrics::{counter, histogram};
use std::time::Instant;

/// Estimate metrics recorder
pub struct EstimationMetrics;

impl EstimationMetrics {
    /// Record how a plan's resources were bucketed
    pub fn record_classification(priced: usize, unsupported: usize, unestimateable: usize) {
        counter!("estimate_resources_total", "bucket" => "priced").increment(priced as u64);
        counter!("estimate_resources_total", "bucket" => "unsupported")
            .increment(unsupported as u64);
        counter!("estimate_resources_total", "bucket" => "unestimateable")
            .increment(unestimateable as u64);
    }

    /// Record a successfully priced asset
    pub fn record_asset_priced(kind: &str) {
        counter!(
            "asset_pricing_total",
            "kind" => kind.to_string(),
            "outcome" => "priced"
        )
        .increment(1);
    }

    /// Record an asset whose price could not be resolved (it contributed 0)
    pub fn record_asset_failed(kind: &str, reason: &str) {
        counter!(
            "asset_pricing_total",
            "kind" => kind.to_string(),
            "outcome" => "failed",
            "reason" => reason.to_string()
        )
        .increment(1);
    }

    /// Record a rejected plan document
    pub fn record_invalid_plan() {
        counter!("estimates_total", "outcome" => "invalid_plan").increment(1);
    }
}

/// Timer guard for one estimate request.
///
/// Records the duration and outcome when `finish()` is called, or as
/// `abandoned` when dropped unfinished.
pub struct EstimateTimer {
    start: Instant,
    finished: bool,
}

impl EstimateTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            finished: false,
        }
    }

    /// Stop the timer. Returns the elapsed time in milliseconds.
    pub fn finish(&mut self, degraded: bool) -> u64 {
        self.record(if degraded { "degraded" } else { "complete" })
    }

    fn record(&mut self, outcome: &'static str) -> u64 {
        if self.finished {
            return 0;
        }
        self.finished = true;

        let elapsed = self.start.elapsed();
        counter!("estimates_total", "outcome" => outcome).increment(1);
        histogram!("estimate_duration_seconds", "outcome" => outcome)
            .record(elapsed.as_secs_f64());

        elapsed.as_millis() as u64
    }
}

impl Drop for EstimateTimer {
    fn drop(&mut self) {
        if !self.finished {
            self.record("abandoned");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_records_once() {
        let mut timer = EstimateTimer::start();
        timer.finish(false);
        assert_eq!(timer.finish(true), 0);
    }
}
