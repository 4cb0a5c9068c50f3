use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use worklist_sync_classifier::Route;

use crate::session::SessionStore;

/// Default bound on retained samples per routing category
pub const DEFAULT_MAX_SAMPLES_PER_CATEGORY: usize = 200;

/// One measured dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub category: Route,
    pub op_type: String,
    pub duration_ms: f64,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate view over both routing paths
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub bypassed_operations: u64,
    pub queued_operations: u64,
    pub average_bypass_ms: f64,
    pub average_queue_ms: f64,
    /// `(avg_queue - avg_bypass) / avg_queue * 100`; zero when no queued
    /// work has been measured
    pub improvement_percent: f64,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct OpTypeStats {
    count: u64,
    total_ms: f64,
}

#[derive(Debug, Default)]
struct CategoryStats {
    count: u64,
    total_ms: f64,
    by_op_type: HashMap<String, OpTypeStats>,
    samples: VecDeque<PerformanceSample>,
}

impl CategoryStats {
    fn record(&mut self, sample: PerformanceSample, cap: usize) {
        self.count += 1;
        self.total_ms += sample.duration_ms;

        let op_stats = self.by_op_type.entry(sample.op_type.clone()).or_default();
        op_stats.count += 1;
        op_stats.total_ms += sample.duration_ms;

        self.samples.push_back(sample);
        while self.samples.len() > cap {
            self.samples.pop_front();
        }
    }

    fn average_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms / self.count as f64
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    bypass: CategoryStats,
    queue: CategoryStats,
}

impl Inner {
    fn category_mut(&mut self, route: Route) -> &mut CategoryStats {
        match route {
            Route::Bypass => &mut self.bypass,
            Route::Queue => &mut self.queue,
        }
    }
}

/// Running latency sums and bounded sample buffers per routing category.
///
/// Optionally backed by a [`SessionStore`]: samples are serialized on
/// every write and merged back in on re-initialization, bounded per
/// category with oldest-first eviction.
pub struct PerfTracker {
    max_samples_per_category: usize,
    store: Option<Arc<dyn SessionStore>>,
    inner: Mutex<Inner>,
}

impl PerfTracker {
    pub fn new() -> Self {
        Self {
            max_samples_per_category: DEFAULT_MAX_SAMPLES_PER_CATEGORY,
            store: None,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_max_samples(mut self, cap: usize) -> Self {
        self.max_samples_per_category = cap;
        self
    }

    /// Attach a session store and replay any samples it already holds.
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        for route in [Route::Bypass, Route::Queue] {
            if let Some(raw) = store.load(&Self::store_key(route)) {
                match serde_json::from_str::<Vec<PerformanceSample>>(&raw) {
                    Ok(samples) => {
                        debug!(
                            route = ?route,
                            count = samples.len(),
                            "restored performance samples from session store"
                        );
                        let mut inner = self.lock();
                        for sample in samples {
                            inner
                                .category_mut(route)
                                .record(sample, self.max_samples_per_category);
                        }
                    }
                    Err(e) => {
                        warn!(route = ?route, error = %e, "discarding unreadable session samples");
                    }
                }
            }
        }

        self.store = Some(store);
        self
    }

    /// Record one measured dispatch.
    pub fn record(&self, route: Route, op_type: &str, duration: Duration) {
        let sample = PerformanceSample {
            category: route,
            op_type: op_type.to_string(),
            duration_ms: duration.as_secs_f64() * 1000.0,
            timestamp: Utc::now(),
        };

        {
            let mut inner = self.lock();
            inner
                .category_mut(route)
                .record(sample, self.max_samples_per_category);
        }

        self.persist(route);
    }

    /// Aggregate counts, averages, and the derived improvement percentage.
    pub fn stats(&self) -> PerformanceStats {
        let inner = self.lock();
        let average_bypass_ms = inner.bypass.average_ms();
        let average_queue_ms = inner.queue.average_ms();

        let improvement_percent = if average_queue_ms > 0.0 {
            (average_queue_ms - average_bypass_ms) / average_queue_ms * 100.0
        } else {
            0.0
        };

        PerformanceStats {
            bypassed_operations: inner.bypass.count,
            queued_operations: inner.queue.count,
            average_bypass_ms,
            average_queue_ms,
            improvement_percent,
        }
    }

    /// Running (count, average ms) for one op type on one route.
    pub fn op_type_stats(&self, route: Route, op_type: &str) -> Option<(u64, f64)> {
        let inner = self.lock();
        let category = match route {
            Route::Bypass => &inner.bypass,
            Route::Queue => &inner.queue,
        };
        category
            .by_op_type
            .get(op_type)
            .map(|s| (s.count, s.total_ms / s.count as f64))
    }

    fn persist(&self, route: Route) {
        let Some(store) = &self.store else {
            return;
        };

        let serialized = {
            let inner = self.lock();
            let category = match route {
                Route::Bypass => &inner.bypass,
                Route::Queue => &inner.queue,
            };
            serde_json::to_string(&category.samples.iter().collect::<Vec<_>>())
        };

        match serialized {
            Ok(json) => store.store(&Self::store_key(route), json),
            Err(e) => warn!(route = ?route, error = %e, "failed to serialize samples"),
        }
    }

    fn store_key(route: Route) -> String {
        match route {
            Route::Bypass => "worklist-sync/perf-samples/bypass".to_string(),
            Route::Queue => "worklist-sync/perf-samples/queue".to_string(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PerfTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::InMemorySessionStore;
    use worklist_sync_types::op_types;

    #[test]
    fn test_stats_empty() {
        let tracker = PerfTracker::new();
        let stats = tracker.stats();
        assert_eq!(stats.bypassed_operations, 0);
        assert_eq!(stats.queued_operations, 0);
        assert_eq!(stats.improvement_percent, 0.0);
    }

    #[test]
    fn test_average_and_improvement() {
        let tracker = PerfTracker::new();
        tracker.record(
            Route::Bypass,
            op_types::UPDATE_COMMENT,
            Duration::from_millis(10),
        );
        tracker.record(
            Route::Queue,
            op_types::MARK_DONE,
            Duration::from_millis(50),
        );

        let stats = tracker.stats();
        assert_eq!(stats.bypassed_operations, 1);
        assert_eq!(stats.queued_operations, 1);
        assert!((stats.average_bypass_ms - 10.0).abs() < 1e-9);
        assert!((stats.average_queue_ms - 50.0).abs() < 1e-9);
        assert!((stats.improvement_percent - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_per_op_type_sums() {
        let tracker = PerfTracker::new();
        tracker.record(
            Route::Queue,
            op_types::MARK_DONE,
            Duration::from_millis(20),
        );
        tracker.record(
            Route::Queue,
            op_types::MARK_DONE,
            Duration::from_millis(40),
        );

        let (count, avg) = tracker
            .op_type_stats(Route::Queue, op_types::MARK_DONE)
            .unwrap();
        assert_eq!(count, 2);
        assert!((avg - 30.0).abs() < 1e-9);

        assert!(tracker
            .op_type_stats(Route::Bypass, op_types::MARK_DONE)
            .is_none());
    }

    #[test]
    fn test_sample_buffer_is_bounded() {
        let tracker = PerfTracker::new().with_max_samples(3);
        for _ in 0..10 {
            tracker.record(
                Route::Bypass,
                op_types::TOGGLE_LOCK,
                Duration::from_millis(1),
            );
        }

        let inner = tracker.lock();
        assert_eq!(inner.bypass.samples.len(), 3);
        // Running counts are not subject to the buffer cap
        assert_eq!(inner.bypass.count, 10);
    }

    #[test]
    fn test_session_store_roundtrip_and_merge() {
        let store = Arc::new(InMemorySessionStore::new());

        let tracker = PerfTracker::new().with_session_store(store.clone());
        tracker.record(
            Route::Bypass,
            op_types::UPDATE_COMMENT,
            Duration::from_millis(5),
        );
        tracker.record(
            Route::Bypass,
            op_types::UPDATE_COMMENT,
            Duration::from_millis(15),
        );
        drop(tracker);

        // Re-initialization merges persisted samples back in
        let restored = PerfTracker::new().with_session_store(store);
        let stats = restored.stats();
        assert_eq!(stats.bypassed_operations, 2);
        assert!((stats.average_bypass_ms - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_session_store_merge_respects_cap() {
        let store = Arc::new(InMemorySessionStore::new());

        let tracker = PerfTracker::new().with_session_store(store.clone());
        for _ in 0..5 {
            tracker.record(
                Route::Queue,
                op_types::MARK_DONE,
                Duration::from_millis(2),
            );
        }
        drop(tracker);

        let restored = PerfTracker::new()
            .with_max_samples(2)
            .with_session_store(store);
        let inner = restored.lock();
        assert_eq!(inner.queue.samples.len(), 2);
    }

    #[test]
    fn test_corrupt_session_data_is_discarded() {
        let store = Arc::new(InMemorySessionStore::new());
        store.store("worklist-sync/perf-samples/bypass", "not-json".to_string());

        let tracker = PerfTracker::new().with_session_store(store);
        assert_eq!(tracker.stats().bypassed_operations, 0);
    }
}
