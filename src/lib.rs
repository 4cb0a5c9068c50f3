//! Client-side operation scheduling and consistency coordination for
//! shared worklist records.
//!
//! The surrounding application constructs one [`Coordinator`] per session
//! and reaches every queue, the state machine, and the consistency
//! validator through it; nothing in this workspace is reachable from a
//! global.

pub mod coordinator;

pub use coordinator::{Coordinator, CoordinatorError};

// Re-export the public surface of the member crates
pub use worklist_sync_classifier::{ClassificationError, ClassificationTable, Route, ViewContext};
pub use worklist_sync_config::{validate_config, AppConfig, ConfigError, ConfigLoader};
pub use worklist_sync_consistency::{
    ConsistencyValidator, DivergenceKind, DivergenceReport, ExpectedState, OperationKind,
};
pub use worklist_sync_lifecycle::{ItemState, Severity, TransitionWarning};
pub use worklist_sync_metrics::{init_tracing, MetricsCollector, MetricsServer};
pub use worklist_sync_scheduler::{
    DispatchObserver, ExecutionQueue, InMemorySessionStore, PerfTracker, PerformanceStats,
    SessionStore,
};
pub use worklist_sync_types::{
    op_types, ItemStatus, Laterality, ObservedItem, OperationMeta, RefreshSnapshot, RemoteError,
    WorkResult, WorklistItem,
};
