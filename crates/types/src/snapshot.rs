use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::ItemStatus;

/// The per-item fields an authoritative refresh reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedItem {
    pub status: ItemStatus,
    pub counter: u32,
}

/// Authoritative bulk state delivered by a refresh of the remote store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSnapshot {
    pub items: HashMap<u64, ObservedItem>,
    pub taken_at: DateTime<Utc>,
}

impl RefreshSnapshot {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            taken_at: Utc::now(),
        }
    }

    pub fn with_item(mut self, id: u64, status: ItemStatus, counter: u32) -> Self {
        self.items.insert(id, ObservedItem { status, counter });
        self
    }

    pub fn get(&self, id: u64) -> Option<&ObservedItem> {
        self.items.get(&id)
    }
}

impl Default for RefreshSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = RefreshSnapshot::new().with_item(7, ItemStatus::Done, 0);

        assert_eq!(
            snapshot.get(7),
            Some(&ObservedItem {
                status: ItemStatus::Done,
                counter: 0
            })
        );
        assert_eq!(snapshot.get(8), None);
    }
}
