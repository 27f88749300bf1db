//! Tick metrics collection and reporting.
//!
//! Uses HDR histograms for accurate latency percentiles.

use crate::config::MetricsConfig;
use crate::extractor::TickOutcome;
use hdrhistogram::Histogram;
use std::time::{Duration, Instant};

/// Latency and outcome counters for extractor ticks
#[derive(Debug)]
pub struct AnalysisMetrics {
    /// Tick latency histogram (microseconds)
    tick_latency_us: Histogram<u64>,

    /// Ticks that produced new bins
    ticks_updated: u64,

    /// Ticks skipped for lack of samples
    ticks_starved: u64,

    started: Instant,
}

/// Summary of key metrics for display
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub tick_p50_us: u64,
    pub tick_p99_us: u64,
    pub tick_max_us: u64,
    pub ticks_updated: u64,
    pub ticks_starved: u64,
    /// Share of ticks that updated the bins (0.0-1.0)
    pub update_rate: f64,
    pub uptime_secs: f64,
}

impl Default for AnalysisMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisMetrics {
    /// Metrics with default bounds (1us to 1s, 2 significant digits).
    pub fn new() -> Self {
        Self::with_config(&MetricsConfig::default())
    }

    pub fn with_config(config: &MetricsConfig) -> Self {
        let precision = config.histogram_precision.clamp(1, 5);
        let max = config.histogram_max_us.max(2);
        let tick_latency_us = Histogram::new_with_bounds(1, max, precision)
            .unwrap_or_else(|e| {
                tracing::warn!("Invalid histogram bounds, using defaults: {}", e);
                Histogram::new(2).expect("2 significant digits is always valid")
            });

        Self {
            tick_latency_us,
            ticks_updated: 0,
            ticks_starved: 0,
            started: Instant::now(),
        }
    }

    /// Record how a tick went and how long it took.
    pub fn record_tick(&mut self, outcome: TickOutcome, duration: Duration) {
        let us = (duration.as_micros() as u64).max(1);
        if let Err(e) = self.tick_latency_us.record(us) {
            tracing::warn!("Failed to record tick latency: {}", e);
        }

        match outcome {
            TickOutcome::Updated => self.ticks_updated += 1,
            TickOutcome::Starved => self.ticks_starved += 1,
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        let total = self.ticks_updated + self.ticks_starved;
        let update_rate = if total > 0 {
            self.ticks_updated as f64 / total as f64
        } else {
            0.0
        };

        MetricsSummary {
            tick_p50_us: self.tick_latency_us.value_at_quantile(0.5),
            tick_p99_us: self.tick_latency_us.value_at_quantile(0.99),
            tick_max_us: self.tick_latency_us.max(),
            ticks_updated: self.ticks_updated,
            ticks_starved: self.ticks_starved,
            update_rate,
            uptime_secs: self.started.elapsed().as_secs_f64(),
        }
    }

    pub fn reset(&mut self) {
        self.tick_latency_us.reset();
        self.ticks_updated = 0;
        self.ticks_starved = 0;
        self.started = Instant::now();
    }
}
