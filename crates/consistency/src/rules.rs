use serde::{Deserialize, Serialize};
use worklist_sync_types::{ItemStatus, ObservedItem};

/// The consistency-relevant mutations an expectation can be logged for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Start,
    Tick,
    MarkDone,
    Unlock,
    Cancel,
}

impl OperationKind {
    /// Stable identifier for logs and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Start => "start",
            OperationKind::Tick => "tick",
            OperationKind::MarkDone => "mark_done",
            OperationKind::Unlock => "unlock",
            OperationKind::Cancel => "cancel",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The post-operation state the caller was told to expect.
///
/// Fields left `None` are not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpectedState {
    pub status: Option<ItemStatus>,
    pub counter: Option<u32>,
}

impl ExpectedState {
    pub fn status(status: ItemStatus) -> Self {
        Self {
            status: Some(status),
            counter: None,
        }
    }

    pub fn with_counter(mut self, counter: u32) -> Self {
        self.counter = Some(counter);
        self
    }
}

/// Per-kind contradiction check between an expectation and the observed
/// record. Returns true when the observation is consistent with the
/// operation having taken effect.
pub(crate) fn observation_consistent(
    kind: OperationKind,
    expected: &ExpectedState,
    observed: &ObservedItem,
) -> bool {
    match kind {
        // A started item must no longer read as Requested
        OperationKind::Start => observed.status != ItemStatus::Requested,

        // The remote may have advanced past our expectation, never behind
        // it; an expected auto-completion must be visible
        OperationKind::Tick => {
            let counter_ok = match expected.counter {
                Some(expected_counter) => observed.counter <= expected_counter,
                None => true,
            };
            let completion_ok = match expected.status {
                Some(ItemStatus::Done) => observed.status == ItemStatus::Done,
                _ => true,
            };
            counter_ok && completion_ok
        }

        OperationKind::MarkDone => observed.status == ItemStatus::Done,

        OperationKind::Unlock => observed.status != ItemStatus::Done,

        OperationKind::Cancel => observed.status == ItemStatus::Cancelled,
    }
}
