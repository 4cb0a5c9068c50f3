use serde::{Deserialize, Serialize};
use tracing::debug;
use worklist_sync_types::ItemStatus;

use crate::warning::TransitionWarning;

/// The locally-projected (status, counter) pair of one worklist item.
///
/// All transition methods consume `self` and either return the successor
/// state or a [`TransitionWarning`]; the caller keeps its original copy
/// when a warning comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemState {
    pub status: ItemStatus,
    pub counter: u32,
}

impl ItemState {
    pub fn new(status: ItemStatus, counter: u32) -> Self {
        Self { status, counter }
    }

    /// Initial state of a freshly scheduled item
    pub fn requested(counter: u32) -> Self {
        Self::new(ItemStatus::Requested, counter)
    }

    /// Requested -> Processing, counter unchanged.
    pub fn start(self) -> Result<Self, TransitionWarning> {
        match self.status {
            ItemStatus::Requested => Ok(Self {
                status: ItemStatus::Processing,
                counter: self.counter,
            }),
            ItemStatus::Processing => Err(TransitionWarning::AlreadyStarted),
            ItemStatus::Done | ItemStatus::Cancelled => Err(TransitionWarning::NotRequested),
        }
    }

    /// Decrement the counter; reaching zero completes the item.
    ///
    /// Only an item in Processing ticks. A tick with nothing left to
    /// decrement, or on a cancelled item, is refused with
    /// `AlreadyAtFloor`; an item that never entered Processing refuses
    /// with `NotStarted`.
    pub fn tick(self) -> Result<Self, TransitionWarning> {
        if self.status == ItemStatus::Cancelled || self.counter == 0 {
            return Err(TransitionWarning::AlreadyAtFloor);
        }
        if self.status != ItemStatus::Processing {
            return Err(TransitionWarning::NotStarted);
        }

        if self.counter == 1 {
            // Last repetition auto-completes the item
            debug!(counter = self.counter, "tick reached floor, completing");
            return Ok(Self {
                status: ItemStatus::Done,
                counter: 0,
            });
        }

        Ok(Self {
            status: self.status,
            counter: self.counter - 1,
        })
    }

    /// Force-complete from any non-terminal, not-yet-done state.
    pub fn mark_done(self) -> Result<Self, TransitionWarning> {
        match self.status {
            ItemStatus::Done => Err(TransitionWarning::AlreadyDone),
            ItemStatus::Cancelled => Err(TransitionWarning::AlreadyCancelled),
            ItemStatus::Requested | ItemStatus::Processing => Ok(Self {
                status: ItemStatus::Done,
                counter: 0,
            }),
        }
    }

    /// Reopen a completed item for one more repetition.
    pub fn unlock(self) -> Result<Self, TransitionWarning> {
        match self.status {
            ItemStatus::Done => Ok(Self {
                status: ItemStatus::Processing,
                counter: 1,
            }),
            _ => Err(TransitionWarning::NotDone),
        }
    }

    /// Abandon an item that has not yet completed.
    pub fn cancel(self) -> Result<Self, TransitionWarning> {
        match self.status {
            ItemStatus::Requested | ItemStatus::Processing => Ok(Self {
                status: ItemStatus::Cancelled,
                counter: self.counter,
            }),
            ItemStatus::Done | ItemStatus::Cancelled => Err(TransitionWarning::CannotCancel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(status: ItemStatus, counter: u32) -> ItemState {
        ItemState::new(status, counter)
    }

    #[test]
    fn test_start_from_requested() {
        let next = state(ItemStatus::Requested, 3).start().unwrap();
        assert_eq!(next, state(ItemStatus::Processing, 3));
    }

    #[test]
    fn test_start_refused_when_already_started() {
        assert_eq!(
            state(ItemStatus::Processing, 3).start(),
            Err(TransitionWarning::AlreadyStarted)
        );
    }

    #[test]
    fn test_start_refused_past_requested() {
        assert_eq!(
            state(ItemStatus::Done, 0).start(),
            Err(TransitionWarning::NotRequested)
        );
        assert_eq!(
            state(ItemStatus::Cancelled, 2).start(),
            Err(TransitionWarning::NotRequested)
        );
    }

    #[test]
    fn test_tick_decrements() {
        let next = state(ItemStatus::Processing, 3).tick().unwrap();
        assert_eq!(next, state(ItemStatus::Processing, 2));
    }

    #[test]
    fn test_tick_auto_completes_at_one() {
        let next = state(ItemStatus::Processing, 1).tick().unwrap();
        assert_eq!(next, state(ItemStatus::Done, 0));
    }

    #[test]
    fn test_tick_refused_at_floor() {
        assert_eq!(
            state(ItemStatus::Processing, 0).tick(),
            Err(TransitionWarning::AlreadyAtFloor)
        );
    }

    #[test]
    fn test_tick_refused_before_start() {
        // A not-yet-started item must not count down, and in particular
        // must never jump straight from Requested to Done
        assert_eq!(
            state(ItemStatus::Requested, 2).tick(),
            Err(TransitionWarning::NotStarted)
        );
        assert_eq!(
            state(ItemStatus::Requested, 1).tick(),
            Err(TransitionWarning::NotStarted)
        );
    }

    #[test]
    fn test_tick_refused_when_cancelled() {
        assert_eq!(
            state(ItemStatus::Cancelled, 5).tick(),
            Err(TransitionWarning::AlreadyAtFloor)
        );
    }

    #[test]
    fn test_mark_done_from_requested() {
        let next = state(ItemStatus::Requested, 2).mark_done().unwrap();
        assert_eq!(next, state(ItemStatus::Done, 0));
    }

    #[test]
    fn test_mark_done_from_processing() {
        let next = state(ItemStatus::Processing, 4).mark_done().unwrap();
        assert_eq!(next, state(ItemStatus::Done, 0));
    }

    #[test]
    fn test_mark_done_idempotent_refusal() {
        assert_eq!(
            state(ItemStatus::Done, 0).mark_done(),
            Err(TransitionWarning::AlreadyDone)
        );
    }

    #[test]
    fn test_mark_done_refused_when_cancelled() {
        assert_eq!(
            state(ItemStatus::Cancelled, 1).mark_done(),
            Err(TransitionWarning::AlreadyCancelled)
        );
    }

    #[test]
    fn test_unlock_reopens_done() {
        let next = state(ItemStatus::Done, 0).unlock().unwrap();
        assert_eq!(next, state(ItemStatus::Processing, 1));
    }

    #[test]
    fn test_unlock_refused_when_not_done() {
        assert_eq!(
            state(ItemStatus::Requested, 0).unlock(),
            Err(TransitionWarning::NotDone)
        );
        assert_eq!(
            state(ItemStatus::Processing, 2).unlock(),
            Err(TransitionWarning::NotDone)
        );
        assert_eq!(
            state(ItemStatus::Cancelled, 0).unlock(),
            Err(TransitionWarning::NotDone)
        );
    }

    #[test]
    fn test_cancel_from_requested_and_processing() {
        assert_eq!(
            state(ItemStatus::Requested, 3).cancel().unwrap(),
            state(ItemStatus::Cancelled, 3)
        );
        assert_eq!(
            state(ItemStatus::Processing, 1).cancel().unwrap(),
            state(ItemStatus::Cancelled, 1)
        );
    }

    #[test]
    fn test_cancel_refused_on_terminal_or_done() {
        assert_eq!(
            state(ItemStatus::Done, 0).cancel(),
            Err(TransitionWarning::CannotCancel)
        );
        assert_eq!(
            state(ItemStatus::Cancelled, 0).cancel(),
            Err(TransitionWarning::CannotCancel)
        );
    }

    #[test]
    fn test_counter_never_goes_negative() {
        // Ticking down from any starting counter stops at the floor
        let mut s = state(ItemStatus::Processing, 3);
        while let Ok(next) = s.tick() {
            s = next;
        }
        assert_eq!(s, state(ItemStatus::Done, 0));
        assert_eq!(s.tick(), Err(TransitionWarning::AlreadyAtFloor));
    }

    #[test]
    fn test_warning_leaves_state_usable() {
        // The caller's copy is untouched after a refusal
        let s = state(ItemStatus::Processing, 2);
        let _ = s.start();
        assert_eq!(s, state(ItemStatus::Processing, 2));
        assert_eq!(s.tick().unwrap(), state(ItemStatus::Processing, 1));
    }
}
