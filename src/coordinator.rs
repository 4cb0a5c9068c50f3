use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};
use worklist_sync_classifier::{ClassificationError, ClassificationTable, ViewContext};
use worklist_sync_config::{validate_config, AppConfig, ConfigError};
use worklist_sync_consistency::{
    ConsistencyValidator, DivergenceReport, ExpectedState, OperationKind,
};
use worklist_sync_lifecycle::TransitionWarning;
use worklist_sync_metrics::MetricsCollector;
use worklist_sync_scheduler::{ExecutionQueue, PerfTracker, PerformanceStats, SessionStore};
use worklist_sync_types::RefreshSnapshot;

/// Construction failure; the coordinator refuses to start on an invalid
/// config or a drifted classification table.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Classification(#[from] ClassificationError),
}

/// Session-level owner of the coordination layer.
///
/// Holds one [`ExecutionQueue`] per view context, a shared latency
/// tracker, and the shared [`ConsistencyValidator`]. Constructed once per
/// application session and passed by reference.
pub struct Coordinator {
    queues: HashMap<ViewContext, ExecutionQueue>,
    validator: ConsistencyValidator,
    perf: Arc<PerfTracker>,
    collector: Arc<MetricsCollector>,
}

impl Coordinator {
    /// Build from a validated configuration. Must be called within a
    /// tokio runtime; each queue starts its drain task here.
    pub fn from_config(config: &AppConfig) -> Result<Self, CoordinatorError> {
        Self::build(config, None)
    }

    /// Same as [`Coordinator::from_config`], with performance samples
    /// persisted to the given session store.
    pub fn from_config_with_store(
        config: &AppConfig,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, CoordinatorError> {
        Self::build(config, Some(store))
    }

    fn build(
        config: &AppConfig,
        store: Option<Arc<dyn SessionStore>>,
    ) -> Result<Self, CoordinatorError> {
        validate_config(config)?;

        let mut table = ClassificationTable::curated();
        for (context, op_types) in &config.classification.extra_queue_required {
            table =
                table.with_extra_queue_required(ViewContext::parse(context), op_types.clone());
        }
        for (context, op_types) in &config.classification.extra_bypass_eligible {
            table =
                table.with_extra_bypass_eligible(ViewContext::parse(context), op_types.clone());
        }
        table.validate()?;
        let table = Arc::new(table);

        let mut perf = PerfTracker::new().with_max_samples(config.scheduler.max_samples_per_category);
        if config.scheduler.persist_samples {
            if let Some(store) = store {
                perf = perf.with_session_store(store);
            }
        }
        let perf = Arc::new(perf);

        let collector = Arc::new(MetricsCollector::new());

        // Every queue reports its submissions and outcomes into the
        // shared dispatch metric families
        let queues = ViewContext::ALL
            .into_iter()
            .map(|context| {
                (
                    context,
                    ExecutionQueue::with_observer(
                        context,
                        table.clone(),
                        perf.clone(),
                        collector.clone(),
                    ),
                )
            })
            .collect();

        let validator = ConsistencyValidator::with_limits(
            Duration::from_secs(config.consistency.window_secs),
            config.consistency.max_entries,
        );

        info!(
            window_secs = config.consistency.window_secs,
            max_samples = config.scheduler.max_samples_per_category,
            "coordination layer initialized"
        );

        Ok(Self {
            queues,
            validator,
            perf,
            collector,
        })
    }

    /// The execution queue serving one view context.
    pub fn queue(&self, context: ViewContext) -> &ExecutionQueue {
        // Every context gets a queue at construction
        self.queues
            .get(&context)
            .unwrap_or_else(|| &self.queues[&ViewContext::Generic])
    }

    pub fn validator(&self) -> &ConsistencyValidator {
        &self.validator
    }

    pub fn metrics(&self) -> &MetricsCollector {
        self.collector.as_ref()
    }

    /// Aggregate latency view over both routing paths, all contexts.
    pub fn performance_stats(&self) -> PerformanceStats {
        self.perf.stats()
    }

    /// Log the expected post-operation state of an item.
    pub fn record_expected(&self, item_id: u64, kind: OperationKind, expected: ExpectedState) {
        self.validator
            .record_operation(item_id, kind, expected, chrono::Utc::now());
    }

    /// Run divergence detection against an authoritative refresh and
    /// update metrics. Returns the reports for the UI layer to surface.
    pub fn apply_refresh(&self, snapshot: &RefreshSnapshot) -> Vec<DivergenceReport> {
        let reports = self.validator.validate_after_refresh(snapshot);
        self.collector.record_divergences(&reports);

        for (context, queue) in &self.queues {
            self.collector.set_queue_depth(*context, queue.depth());
        }

        reports
    }

    /// Surface a refused state-machine transition: counted in metrics and
    /// logged at its own severity.
    pub fn report_transition_warning(&self, item_id: u64, warning: TransitionWarning) {
        self.collector.record_transition_warning(warning);
        match warning.severity() {
            worklist_sync_lifecycle::Severity::Info => {
                info!(item_id, code = warning.code(), "transition had no effect")
            }
            worklist_sync_lifecycle::Severity::Warning => {
                warn!(item_id, code = warning.code(), %warning, "transition refused")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_default_config() {
        let coordinator = Coordinator::from_config(&AppConfig::default()).unwrap();
        assert_eq!(
            coordinator.queue(ViewContext::Billing).context(),
            ViewContext::Billing
        );
    }

    #[tokio::test]
    async fn test_dispatch_metrics_flow_from_submissions() {
        use worklist_sync_types::{op_types, OperationMeta, RefreshSnapshot};

        let coordinator = Coordinator::from_config(&AppConfig::default()).unwrap();
        coordinator
            .queue(ViewContext::TaskWorklist)
            .submit(
                OperationMeta::new("task-worklist", op_types::UPDATE_COMMENT),
                || async { Ok(RefreshSnapshot::new()) },
            )
            .await
            .unwrap()
            .unwrap();

        let exported = coordinator.metrics().export_metrics().unwrap();
        assert!(exported.contains("worklist_sync_operations_submitted_total"));
        assert!(exported.contains("worklist_sync_operations_completed_total"));
    }

    #[tokio::test]
    async fn test_invalid_config_is_refused() {
        let mut config = AppConfig::default();
        config.consistency.window_secs = 0;

        assert!(matches!(
            Coordinator::from_config(&config),
            Err(CoordinatorError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_conflicting_classification_extras_are_refused() {
        let mut config = AppConfig::default();
        config
            .classification
            .extra_queue_required
            .insert("billing".to_string(), vec!["void-invoice".to_string()]);
        config
            .classification
            .extra_bypass_eligible
            .insert("billing".to_string(), vec!["void-invoice".to_string()]);

        // Caught by config validation before the table is even built
        assert!(Coordinator::from_config(&config).is_err());
    }
}
