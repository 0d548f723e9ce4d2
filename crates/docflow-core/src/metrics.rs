//! Metrics boundary
//!
//! Sinks are advisory: they are thread-safe, never block meaningfully and
//! never fail the caller.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

pub const METRIC_TRANSITION_SUCCESS: &str = "workflow.transition.success";
pub const METRIC_TRANSITION_FAILURE: &str = "workflow.transition.failure";
pub const METRIC_TRANSITION_LATENCY: &str = "workflow.transition.latency_ms";

/// Per-kind failure counter name, e.g. `workflow.transition.failure.permission`
pub fn failure_metric(label: &str) -> String {
    format!("{}.{}", METRIC_TRANSITION_FAILURE, label)
}

/// Counter and latency sink injected into the workflow service
pub trait MetricsSink: Send + Sync {
    fn increment(&self, name: &str);
    fn record_latency(&self, name: &str, value_ms: f64);
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn increment(&self, _name: &str) {}
    fn record_latency(&self, _name: &str, _value_ms: f64) {}
}

/// Aggregated latency figures for one metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySummary {
    pub count: usize,
    pub avg_ms: f64,
    pub max_ms: f64,
}

/// Point-in-time copy of an `InMemoryMetrics`
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct MetricsSnapshot {
    pub counters: BTreeMap<String, u64>,
    pub latencies: BTreeMap<String, LatencySummary>,
}

impl MetricsSnapshot {
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }
}

/// Running aggregate for one latency metric
#[derive(Debug, Clone, Copy, Default)]
struct LatencyStats {
    count: usize,
    sum_ms: f64,
    max_ms: f64,
}

impl LatencyStats {
    fn record(&mut self, value_ms: f64) {
        self.count += 1;
        self.sum_ms += value_ms;
        self.max_ms = self.max_ms.max(value_ms);
    }

    fn summary(&self) -> LatencySummary {
        let avg_ms = if self.count == 0 {
            0.0
        } else {
            self.sum_ms / self.count as f64
        };
        LatencySummary {
            count: self.count,
            avg_ms,
            max_ms: self.max_ms,
        }
    }
}

#[derive(Default)]
struct MetricsState {
    counters: BTreeMap<String, u64>,
    latencies: BTreeMap<String, LatencyStats>,
}

/// In-process collector behind a mutex
#[derive(Default)]
pub struct InMemoryMetrics {
    state: Mutex<MetricsState>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    // Recover from poisoning.
    fn state(&self) -> MutexGuard<'_, MetricsState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.state();
        let latencies = state
            .latencies
            .iter()
            .map(|(name, stats)| (name.clone(), stats.summary()))
            .collect();

        MetricsSnapshot {
            counters: state.counters.clone(),
            latencies,
        }
    }
}

impl MetricsSink for InMemoryMetrics {
    fn increment(&self, name: &str) {
        *self.state().counters.entry(name.to_string()).or_insert(0) += 1;
    }

    fn record_latency(&self, name: &str, value_ms: f64) {
        if !value_ms.is_finite() {
            return;
        }
        self.state()
            .latencies
            .entry(name.to_string())
            .or_default()
            .record(value_ms);
    }
}
