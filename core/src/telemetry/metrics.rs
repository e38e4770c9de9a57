use serde::Serialize;
use std::sync::Mutex;

/// Request lifecycle counters, as seen by the orchestrator.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct RequestCounters {
    pub issued: usize,
    pub applied: usize,
    pub superseded: usize,
    pub failed: usize,
}

pub struct MetricsRecorder {
    inner: Mutex<RequestCounters>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RequestCounters::default()),
        }
    }

    pub fn record_issued(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.issued += 1;
        }
    }

    pub fn record_applied(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.applied += 1;
        }
    }

    pub fn record_superseded(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.superseded += 1;
        }
    }

    pub fn record_failed(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.failed += 1;
        }
    }

    pub fn snapshot(&self) -> RequestCounters {
        self.inner.lock().map(|c| *c).unwrap_or_default()
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
        let recorder = MetricsRecorder::new();
        recorder.record_issued();
        recorder.record_issued();
        recorder.record_applied();
        recorder.record_superseded();
        assert_eq!(
            recorder.snapshot(),
            RequestCounters {
                issued: 2,
                applied: 1,
                superseded: 1,
                failed: 0,
            }
        );
    }
}
