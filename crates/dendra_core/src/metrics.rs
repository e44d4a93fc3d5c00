//! Run statistics and logging setup.

use crate::simulation::StepReport;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters accumulated over a run.
pub struct Metrics {
    step_count: AtomicU64,
    segment_count: AtomicU64,
    branch_count: AtomicU64,
    bifurcation_count: AtomicU64,
    dormant_count: AtomicU64,
    log_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Metrics {
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            step_count: AtomicU64::new(0),
            segment_count: AtomicU64::new(0),
            branch_count: AtomicU64::new(0),
            bifurcation_count: AtomicU64::new(0),
            dormant_count: AtomicU64::new(0),
            log_interval: log_interval.max(1),
            start_time: Instant::now(),
        }
    }

    /// Records a completed step with its duration.
    pub fn record_step(&self, report: &StepReport, segments: usize, duration: Duration) {
        let step = self.step_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.segment_count.store(segments as u64, Ordering::Relaxed);
        self.branch_count
            .fetch_add(report.branched as u64, Ordering::Relaxed);
        self.bifurcation_count
            .fetch_add(report.bifurcated as u64, Ordering::Relaxed);
        self.dormant_count
            .store(report.dormant as u64, Ordering::Relaxed);

        if step % self.log_interval == 0 {
            tracing::info!(
                step = step,
                segments = segments,
                branches = self.branch_count(),
                bifurcations = self.bifurcation_count(),
                dormant = report.dormant,
                duration_us = duration.as_micros() as u64,
                "Simulation step"
            );
        }
    }

    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn segment_count(&self) -> u64 {
        self.segment_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn branch_count(&self) -> u64 {
        self.branch_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn bifurcation_count(&self) -> u64 {
        self.bifurcation_count.load(Ordering::Relaxed)
    }

    /// Dormant tips seen in the most recent step.
    #[must_use]
    pub fn dormant_count(&self) -> u64 {
        self.dormant_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new(10);
        assert_eq!(metrics.step_count(), 0);
    }

    #[test]
    fn test_record_step() {
        let metrics = Metrics::default();
        let report = StepReport {
            step: 0,
            elongated: 3,
            branched: 1,
            bifurcated: 2,
            dormant: 4,
            new_segments: 6,
        };
        metrics.record_step(&report, 20, Duration::from_millis(1));
        metrics.record_step(&report, 26, Duration::from_millis(1));
        assert_eq!(metrics.step_count(), 2);
        assert_eq!(metrics.segment_count(), 26);
        assert_eq!(metrics.branch_count(), 2);
        assert_eq!(metrics.bifurcation_count(), 4);
        assert_eq!(metrics.dormant_count(), 4);
    }
}
