use std::sync::Mutex;

/// Counters for renders, charge mutations and exports.
pub struct RenderMetrics {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub renders: usize,
    pub mutations: usize,
    pub exports: usize,
}

#[derive(Default)]
struct Metrics {
    renders: usize,
    mutations: usize,
    exports: usize,
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_render(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.renders += 1;
        }
    }

    pub fn record_mutation(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.mutations += 1;
        }
    }

    pub fn record_export(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.exports += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                renders: metrics.renders,
                mutations: metrics.mutations,
                exports: metrics.exports,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for RenderMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_events() {
        let metrics = RenderMetrics::new();
        metrics.record_render();
        metrics.record_render();
        metrics.record_mutation();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.renders, 2);
        assert_eq!(snapshot.mutations, 1);
        assert_eq!(snapshot.exports, 0);
    }
}
