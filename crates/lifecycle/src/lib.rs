//! Transition logic for the status and remaining-repetitions counter of a
//! shared worklist item.
//!
//! Every transition is a pure, total function: an attempt that is invalid
//! for the current state comes back as a [`TransitionWarning`] value with
//! the state untouched. Nothing here panics and nothing here talks to the
//! remote store.

mod machine;
mod warning;

pub use machine::ItemState;
pub use warning::{Severity, TransitionWarning};
