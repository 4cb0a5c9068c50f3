use std::time::Duration;

use prometheus::{Encoder, TextEncoder};
use worklist_sync_classifier::{Route, ViewContext};
use worklist_sync_consistency::DivergenceReport;
use worklist_sync_lifecycle::TransitionWarning;
use worklist_sync_scheduler::DispatchObserver;

use crate::metrics::*;

/// Metrics collector for the worklist coordination layer.
///
/// The metric families are process-wide statics; the collector is a cheap
/// handle for recording into them and exporting them.
pub struct MetricsCollector;

impl MetricsCollector {
    pub fn new() -> Self {
        Self
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DISPATCH METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Record an operation submitted to a queue
    pub fn record_submitted(&self, route: Route, op_type: &str) {
        OPERATIONS_SUBMITTED
            .with_label_values(&[route_label(route), op_type])
            .inc();
    }

    /// Record an operation outcome with its work duration
    pub fn record_outcome(&self, route: Route, op_type: &str, succeeded: bool, duration: Duration) {
        let counter: &prometheus::IntCounterVec = if succeeded {
            &OPERATIONS_COMPLETED
        } else {
            &OPERATIONS_FAILED
        };
        counter.with_label_values(&[route_label(route), op_type]).inc();

        DISPATCH_LATENCY
            .with_label_values(&[route_label(route)])
            .observe(duration.as_millis() as f64);
    }

    /// Update the waiting-entry gauge for one context's queue
    pub fn set_queue_depth(&self, context: ViewContext, depth: usize) {
        QUEUE_DEPTH
            .with_label_values(&[context.as_str()])
            .set(depth as i64);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE MACHINE METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Record a refused state-machine transition
    pub fn record_transition_warning(&self, warning: TransitionWarning) {
        TRANSITION_WARNINGS
            .with_label_values(&[warning.code()])
            .inc();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONSISTENCY METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Record a batch of post-refresh divergence reports
    pub fn record_divergences(&self, reports: &[DivergenceReport]) {
        for report in reports {
            DIVERGENCES.with_label_values(&[report.kind.as_str()]).inc();
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EXPORT
    // ═══════════════════════════════════════════════════════════════════════════

    /// Export metrics in Prometheus text format
    pub fn export_metrics(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::EncodingError(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| MetricsError::EncodingError(e.to_string()))
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Lets the execution queues feed the dispatch families directly.
impl DispatchObserver for MetricsCollector {
    fn operation_submitted(&self, route: Route, op_type: &str) {
        self.record_submitted(route, op_type);
    }

    fn operation_finished(&self, route: Route, op_type: &str, succeeded: bool, duration: Duration) {
        self.record_outcome(route, op_type, succeeded, duration);
    }
}

fn route_label(route: Route) -> &'static str {
    match route {
        Route::Bypass => "bypass",
        Route::Queue => "queue",
    }
}

/// Metrics error types
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("encoding error: {0}")]
    EncodingError(String),
}
