//! Per-view-context operation scheduler.
//!
//! A submitted unit of work is classified once and then either spawned
//! immediately (Bypass) or appended to a FIFO drained by a single task
//! (Queue). Queue-routed work executes strictly one at a time, in
//! submission order; a failure is delivered to the submitter and the drain
//! keeps going. The scheduler performs no retries and imposes no timeout
//! on the work it runs.

mod perf;
mod queue;
mod session;

pub use perf::{PerfTracker, PerformanceSample, PerformanceStats};
pub use queue::{DispatchObserver, ExecutionQueue, WorkFn};
pub use session::{InMemorySessionStore, SessionStore};
