use std::sync::Mutex;

/// Counters for radar events and what became of them.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub events: usize,
    pub suppressed: usize,
    pub captures: usize,
    pub entries: usize,
    pub ignored: usize,
    pub sink_errors: usize,
}

type Metrics = MetricsSnapshot;

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut Metrics)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }

    pub fn record_event(&self) {
        self.update(|m| m.events += 1);
    }

    pub fn record_suppressed(&self) {
        self.update(|m| m.suppressed += 1);
    }

    pub fn record_capture(&self) {
        self.update(|m| m.captures += 1);
    }

    pub fn record_entry(&self) {
        self.update(|m| m.entries += 1);
    }

    pub fn record_ignored(&self) {
        self.update(|m| m.ignored += 1);
    }

    pub fn record_sink_error(&self) {
        self.update(|m| m.sink_errors += 1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let metrics = MetricsRecorder::new();
        metrics.record_event();
        metrics.record_capture();
        metrics.record_capture();
        metrics.record_entry();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.events, 1);
        assert_eq!(snapshot.captures, 2);
        assert_eq!(snapshot.entries, 1);
        assert_eq!(snapshot.sink_errors, 0);
    }
}
