use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use worklist_sync_types::{ObservedItem, RefreshSnapshot};

use crate::log::{ExpectationLog, ExpectationLogEntry, DEFAULT_MAX_ENTRIES, DEFAULT_WINDOW};
use crate::rules::{observation_consistent, ExpectedState, OperationKind};

/// What kind of contradiction a refresh revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceKind {
    /// The item was expected to exist but is absent from the snapshot
    MissingAfterOperation,

    /// The item is present but contradicts the recorded expectation
    StateDivergence,
}

impl DivergenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DivergenceKind::MissingAfterOperation => "missing_after_operation",
            DivergenceKind::StateDivergence => "divergence",
        }
    }
}

/// One detected contradiction between an operation's expected effect and
/// the authoritative state observed after a refresh. Informational only;
/// recovery is left to the operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivergenceReport {
    pub item_id: u64,
    pub operation: OperationKind,
    pub kind: DivergenceKind,
    pub expected: ExpectedState,
    pub observed: Option<ObservedItem>,
    pub detected_at: DateTime<Utc>,
}

/// Logs expected post-operation states and flags apparent reversions once
/// an authoritative refresh snapshot arrives.
pub struct ConsistencyValidator {
    log: Mutex<ExpectationLog>,
}

impl ConsistencyValidator {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_WINDOW, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_limits(window: Duration, max_entries: usize) -> Self {
        Self {
            log: Mutex::new(ExpectationLog::new(window, max_entries)),
        }
    }

    /// Log what the remote record should look like after an operation the
    /// caller was told succeeded.
    pub fn record_operation(
        &self,
        item_id: u64,
        kind: OperationKind,
        expected: ExpectedState,
        recorded_at: DateTime<Utc>,
    ) {
        self.lock().push(ExpectationLogEntry {
            item_id,
            kind,
            expected,
            recorded_at,
        });
    }

    /// Check every still-fresh expectation against the snapshot.
    ///
    /// The most recent expectation per item wins when duplicates exist.
    /// Never mutates the snapshot and never retries anything.
    pub fn validate_after_refresh(&self, snapshot: &RefreshSnapshot) -> Vec<DivergenceReport> {
        let now = Utc::now();
        let mut log = self.lock();

        // Oldest-first iteration, so a later insert replaces an earlier one
        let mut latest: HashMap<u64, ExpectationLogEntry> = HashMap::new();
        for entry in log.fresh(now) {
            latest.insert(entry.item_id, entry.clone());
        }

        let mut reports = Vec::new();
        for (item_id, entry) in latest {
            let report = match snapshot.get(item_id) {
                None => DivergenceReport {
                    item_id,
                    operation: entry.kind,
                    kind: DivergenceKind::MissingAfterOperation,
                    expected: entry.expected,
                    observed: None,
                    detected_at: now,
                },
                Some(observed) => {
                    if observation_consistent(entry.kind, &entry.expected, observed) {
                        continue;
                    }
                    DivergenceReport {
                        item_id,
                        operation: entry.kind,
                        kind: DivergenceKind::StateDivergence,
                        expected: entry.expected,
                        observed: Some(*observed),
                        detected_at: now,
                    }
                }
            };

            warn!(
                item_id,
                operation = %report.operation,
                kind = report.kind.as_str(),
                expected = ?report.expected,
                observed = ?report.observed,
                "operation appears to have reverted after refresh"
            );
            reports.push(report);
        }

        reports
    }

    fn lock(&self) -> MutexGuard<'_, ExpectationLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ConsistencyValidator {
    fn default() -> Self {
        Self::new()
    }
}
