use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How loudly a refused transition should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// A transition attempt that was invalid for the current state.
///
/// This is a soft outcome, not a failure: the state machine returns it as
/// data and leaves the input state unchanged. Callers surface it to the
/// operator and move on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionWarning {
    /// `start` on an item already in Processing
    #[error("item already started")]
    AlreadyStarted,

    /// `start` on an item past the Requested state
    #[error("item is not in the requested state")]
    NotRequested,

    /// `tick` with nothing left to decrement, or on a cancelled item
    #[error("counter already at floor")]
    AlreadyAtFloor,

    /// `tick` on an item that never entered Processing
    #[error("item has not been started")]
    NotStarted,

    /// `mark_done` on an item already Done
    #[error("item already done")]
    AlreadyDone,

    /// `mark_done` on a cancelled item
    #[error("item already cancelled")]
    AlreadyCancelled,

    /// `unlock` on an item that is not Done
    #[error("item is not done")]
    NotDone,

    /// `cancel` on an item already Done or Cancelled
    #[error("item can no longer be cancelled")]
    CannotCancel,
}

impl TransitionWarning {
    /// Stable identifier for logs and metric labels
    pub fn code(&self) -> &'static str {
        match self {
            TransitionWarning::AlreadyStarted => "already_started",
            TransitionWarning::NotRequested => "not_requested",
            TransitionWarning::AlreadyAtFloor => "already_at_floor",
            TransitionWarning::NotStarted => "not_started",
            TransitionWarning::AlreadyDone => "already_done",
            TransitionWarning::AlreadyCancelled => "already_cancelled",
            TransitionWarning::NotDone => "not_done",
            TransitionWarning::CannotCancel => "cannot_cancel",
        }
    }

    /// A repeated `mark_done` is benign; everything else deserves a warning
    pub fn severity(&self) -> Severity {
        match self {
            TransitionWarning::AlreadyDone => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(TransitionWarning::AlreadyAtFloor.code(), "already_at_floor");
        assert_eq!(TransitionWarning::NotStarted.code(), "not_started");
        assert_eq!(TransitionWarning::CannotCancel.code(), "cannot_cancel");
    }

    #[test]
    fn test_only_already_done_is_info() {
        assert_eq!(TransitionWarning::AlreadyDone.severity(), Severity::Info);
        assert_eq!(TransitionWarning::NotDone.severity(), Severity::Warning);
        assert_eq!(
            TransitionWarning::AlreadyStarted.severity(),
            Severity::Warning
        );
    }
}
