use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a worklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Scheduled but not yet started
    Requested,

    /// Work in progress, counter decrementing
    Processing,

    /// All repetitions complete
    Done,

    /// Abandoned; terminal
    Cancelled,
}

impl ItemStatus {
    /// Stable string identifier, used for logging and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Requested => "requested",
            ItemStatus::Processing => "processing",
            ItemStatus::Done => "done",
            ItemStatus::Cancelled => "cancelled",
        }
    }

    /// Cancelled is the only state no transition leaves
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Cancelled)
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anatomical side of the scheduled task. Carried through the layer but
/// never interpreted by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Laterality {
    Left,
    Right,
    Bilateral,
    #[default]
    Unspecified,
}

/// One scheduled clinical task on the shared worklist.
///
/// The remote store owns the record; instances held here are transient,
/// locally-computed projections of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorklistItem {
    /// Unique identifier assigned by the remote store
    pub id: u64,

    pub status: ItemStatus,

    /// Remaining repetitions; never negative
    pub counter: u32,

    pub laterality: Laterality,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorklistItem {
    pub fn new(id: u64, counter: u32) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: ItemStatus::Requested,
            counter,
            laterality: Laterality::Unspecified,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_laterality(mut self, laterality: Laterality) -> Self {
        self.laterality = laterality;
        self
    }
}
