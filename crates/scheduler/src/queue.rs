use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use worklist_sync_classifier::{ClassificationTable, Route, ViewContext};
use worklist_sync_types::{OperationMeta, WorkResult};

use crate::perf::PerfTracker;

/// A deferred remote mutation, typically a closure over the invoker call
pub type WorkFn = Box<dyn FnOnce() -> BoxFuture<'static, WorkResult> + Send>;

/// Dispatch accounting hook, called once per submission and once per
/// outcome. The metrics layer implements this; the queue itself only
/// tracks latency through its [`PerfTracker`].
pub trait DispatchObserver: Send + Sync {
    fn operation_submitted(&self, route: Route, op_type: &str);
    fn operation_finished(&self, route: Route, op_type: &str, succeeded: bool, duration: Duration);
}

struct QueueEntry {
    meta: OperationMeta,
    work: WorkFn,
    done: oneshot::Sender<WorkResult>,
}

/// Per-view-context scheduler for worklist mutations.
///
/// `submit` classifies the operation and returns a receiver for its
/// outcome without ever suspending the caller. Queue-routed entries run
/// strictly one at a time in submission order on a single drain task;
/// bypass-routed entries are spawned immediately with no ordering
/// guarantee against anything else in flight. There is no per-record
/// mutual exclusion for bypass work; the curated bypass lists only admit
/// operations whose effects are idempotent or commute.
pub struct ExecutionQueue {
    context: ViewContext,
    table: Arc<ClassificationTable>,
    perf: Arc<PerfTracker>,
    observer: Option<Arc<dyn DispatchObserver>>,
    fifo: mpsc::UnboundedSender<QueueEntry>,
    depth: Arc<AtomicUsize>,
}

impl ExecutionQueue {
    /// Create a queue and start its drain task.
    ///
    /// Must be called within a tokio runtime; the drain task exits when
    /// the queue is dropped.
    pub fn new(
        context: ViewContext,
        table: Arc<ClassificationTable>,
        perf: Arc<PerfTracker>,
    ) -> Self {
        Self::build(context, table, perf, None)
    }

    /// Same as [`ExecutionQueue::new`], with a dispatch accounting hook.
    pub fn with_observer(
        context: ViewContext,
        table: Arc<ClassificationTable>,
        perf: Arc<PerfTracker>,
        observer: Arc<dyn DispatchObserver>,
    ) -> Self {
        Self::build(context, table, perf, Some(observer))
    }

    fn build(
        context: ViewContext,
        table: Arc<ClassificationTable>,
        perf: Arc<PerfTracker>,
        observer: Option<Arc<dyn DispatchObserver>>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let depth = Arc::new(AtomicUsize::new(0));

        tokio::spawn(drain(
            context,
            rx,
            perf.clone(),
            depth.clone(),
            observer.clone(),
        ));

        Self {
            context,
            table,
            perf,
            observer,
            fifo: tx,
            depth,
        }
    }

    pub fn context(&self) -> ViewContext {
        self.context
    }

    /// Queue-routed entries waiting behind the one currently executing
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }

    /// Submit one unit of work.
    ///
    /// The receiver resolves with the work's own outcome: `Ok` with the
    /// invoker's snapshot or `Err` with the verbatim [`RemoteError`]. A
    /// failure never halts the queue and is never retried here. Dropping
    /// the receiver does not cancel the work.
    pub fn submit<F, Fut>(&self, meta: OperationMeta, work: F) -> oneshot::Receiver<WorkResult>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = WorkResult> + Send + 'static,
    {
        self.submit_boxed(meta, Box::new(move || Box::pin(work())))
    }

    fn submit_boxed(&self, meta: OperationMeta, work: WorkFn) -> oneshot::Receiver<WorkResult> {
        let (done, rx) = oneshot::channel();
        let route = self
            .table
            .classify(self.context, &meta.op_type, meta.bypass_queue);

        debug!(
            operation_id = %meta.id,
            context = %self.context,
            op_type = %meta.op_type,
            route = ?route,
            "operation submitted"
        );
        if let Some(observer) = &self.observer {
            observer.operation_submitted(route, &meta.op_type);
        }

        match route {
            Route::Bypass => {
                let perf = self.perf.clone();
                let observer = self.observer.clone();
                tokio::spawn(async move {
                    let started = Instant::now();
                    let result = (work)().await;
                    let elapsed = started.elapsed();
                    perf.record(Route::Bypass, &meta.op_type, elapsed);
                    if let Some(observer) = &observer {
                        observer.operation_finished(
                            Route::Bypass,
                            &meta.op_type,
                            result.is_ok(),
                            elapsed,
                        );
                    }

                    if let Err(e) = &result {
                        warn!(
                            operation_id = %meta.id,
                            op_type = %meta.op_type,
                            error = %e,
                            "bypass operation failed"
                        );
                    }

                    // Submitter may have dropped the receiver
                    let _ = done.send(result);
                });
            }
            Route::Queue => {
                self.depth.fetch_add(1, Ordering::Relaxed);
                let entry = QueueEntry { meta, work, done };
                if let Err(e) = self.fifo.send(entry) {
                    // Drain task is gone; deliver the failure instead of
                    // silently dropping the submission
                    self.depth.fetch_sub(1, Ordering::Relaxed);
                    let entry = e.0;
                    warn!(operation_id = %entry.meta.id, "queue drain task stopped, rejecting");
                    let _ = entry.done.send(Err(worklist_sync_types::RemoteError::new(
                        503,
                        "execution queue is shut down",
                    )));
                }
            }
        }

        rx
    }
}

/// Single consumer draining the FIFO: one entry at a time, in submission
/// order, continuing past failures.
async fn drain(
    context: ViewContext,
    mut rx: mpsc::UnboundedReceiver<QueueEntry>,
    perf: Arc<PerfTracker>,
    depth: Arc<AtomicUsize>,
    observer: Option<Arc<dyn DispatchObserver>>,
) {
    while let Some(entry) = rx.recv().await {
        depth.fetch_sub(1, Ordering::Relaxed);

        let started = Instant::now();
        let result = (entry.work)().await;
        let elapsed = started.elapsed();
        perf.record(Route::Queue, &entry.meta.op_type, elapsed);
        if let Some(observer) = &observer {
            observer.operation_finished(
                Route::Queue,
                &entry.meta.op_type,
                result.is_ok(),
                elapsed,
            );
        }

        match &result {
            Ok(_) => debug!(
                operation_id = %entry.meta.id,
                context = %context,
                op_type = %entry.meta.op_type,
                elapsed_ms = elapsed.as_millis() as u64,
                "queued operation completed"
            ),
            Err(e) => warn!(
                operation_id = %entry.meta.id,
                context = %context,
                op_type = %entry.meta.op_type,
                error = %e,
                "queued operation failed, continuing drain"
            ),
        }

        let _ = entry.done.send(result);
    }
}
