//! Metrics and observability for the worklist coordination layer

pub mod collector;
pub mod http;
pub mod metrics;
pub mod tracing;

pub use collector::{MetricsCollector, MetricsError};
pub use http::{MetricsServer, MetricsServerError};
pub use tracing::{init_tracing, TracingError};
