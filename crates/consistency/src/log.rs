use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rules::{ExpectedState, OperationKind};

/// Expectations older than this are no longer checked
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(30);

/// Hard cap on retained expectations, oldest evicted first
pub const DEFAULT_MAX_ENTRIES: usize = 256;

/// One logged expectation about the remote record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectationLogEntry {
    pub item_id: u64,
    pub kind: OperationKind,
    pub expected: ExpectedState,
    pub recorded_at: DateTime<Utc>,
}

/// Time-windowed, capped append-only log of expectations.
#[derive(Debug)]
pub(crate) struct ExpectationLog {
    window: chrono::Duration,
    max_entries: usize,
    entries: VecDeque<ExpectationLogEntry>,
}

impl ExpectationLog {
    pub fn new(window: Duration, max_entries: usize) -> Self {
        Self {
            // Window values are small; saturate rather than fail
            window: chrono::Duration::from_std(window)
                .unwrap_or_else(|_| chrono::Duration::seconds(30)),
            max_entries,
            entries: VecDeque::new(),
        }
    }

    pub fn push(&mut self, entry: ExpectationLogEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Iterate the still-fresh entries oldest first.
    ///
    /// Timestamps are caller-supplied and need not arrive in order, so a
    /// stale entry can sit behind a fresher one; the filter is what
    /// enforces the window. Popping the front is only compaction.
    pub fn fresh(&mut self, now: DateTime<Utc>) -> impl Iterator<Item = &ExpectationLogEntry> {
        let cutoff = now - self.window;
        while matches!(self.entries.front(), Some(e) if e.recorded_at < cutoff) {
            self.entries.pop_front();
        }
        self.entries.iter().filter(move |e| e.recorded_at >= cutoff)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worklist_sync_types::ItemStatus;

    fn entry(item_id: u64, recorded_at: DateTime<Utc>) -> ExpectationLogEntry {
        ExpectationLogEntry {
            item_id,
            kind: OperationKind::MarkDone,
            expected: ExpectedState::status(ItemStatus::Done),
            recorded_at,
        }
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut log = ExpectationLog::new(Duration::from_secs(30), 3);
        let now = Utc::now();
        for i in 0..5 {
            log.push(entry(i, now));
        }

        assert_eq!(log.len(), 3);
        let ids: Vec<u64> = log.fresh(now).map(|e| e.item_id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_window_prunes_on_access() {
        let mut log = ExpectationLog::new(Duration::from_secs(30), 16);
        let now = Utc::now();
        log.push(entry(1, now - chrono::Duration::seconds(45)));
        log.push(entry(2, now - chrono::Duration::seconds(10)));

        let ids: Vec<u64> = log.fresh(now).map(|e| e.item_id).collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_stale_entry_behind_a_fresh_one_is_ignored() {
        let mut log = ExpectationLog::new(Duration::from_secs(30), 16);
        let now = Utc::now();

        // Timestamps out of insertion order: the stale entry is not at
        // the front and cannot be popped away
        log.push(entry(1, now));
        log.push(entry(2, now - chrono::Duration::seconds(120)));

        let ids: Vec<u64> = log.fresh(now).map(|e| e.item_id).collect();
        assert_eq!(ids, vec![1]);
    }
}
