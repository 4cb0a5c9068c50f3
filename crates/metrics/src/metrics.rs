use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};

lazy_static! {
    // ═══════════════════════════════════════════════════════════════════════════
    // DISPATCH METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Operations submitted, by routing path and operation type
    pub static ref OPERATIONS_SUBMITTED: IntCounterVec = register_int_counter_vec!(
        "worklist_sync_operations_submitted_total",
        "Total operations submitted to an execution queue",
        &["route", "op_type"]
    )
    .unwrap();

    /// Operations that resolved successfully
    pub static ref OPERATIONS_COMPLETED: IntCounterVec = register_int_counter_vec!(
        "worklist_sync_operations_completed_total",
        "Total operations whose remote call succeeded",
        &["route", "op_type"]
    )
    .unwrap();

    /// Operations whose remote call rejected
    pub static ref OPERATIONS_FAILED: IntCounterVec = register_int_counter_vec!(
        "worklist_sync_operations_failed_total",
        "Total operations whose remote call failed",
        &["route", "op_type"]
    )
    .unwrap();

    /// Work duration by routing path
    pub static ref DISPATCH_LATENCY: HistogramVec = register_histogram_vec!(
        "worklist_sync_dispatch_latency_ms",
        "Duration of a unit of work in milliseconds",
        &["route"]
    )
    .unwrap();

    /// Queue-routed entries waiting, per view context
    pub static ref QUEUE_DEPTH: IntGaugeVec = register_int_gauge_vec!(
        "worklist_sync_queue_depth",
        "Queue-routed entries waiting behind the executing one",
        &["context"]
    )
    .unwrap();

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE MACHINE METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Refused transitions, by stable warning code
    pub static ref TRANSITION_WARNINGS: IntCounterVec = register_int_counter_vec!(
        "worklist_sync_transition_warnings_total",
        "State-machine transitions refused for the current state",
        &["code"]
    )
    .unwrap();

    // ═══════════════════════════════════════════════════════════════════════════
    // CONSISTENCY METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Post-refresh divergences, by kind
    pub static ref DIVERGENCES: IntCounterVec = register_int_counter_vec!(
        "worklist_sync_divergences_total",
        "Operations that appear to have reverted after a refresh",
        &["kind"]
    )
    .unwrap();
}
