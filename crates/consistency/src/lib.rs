//! Detection of silently reverted operations.
//!
//! After an operation succeeds, the caller records what the remote record
//! should now look like. When the next authoritative refresh arrives, each
//! still-fresh expectation is checked against the observed state; any
//! contradiction is reported as a divergence. Purely diagnostic: nothing
//! here retries, corrects, or blocks.

mod log;
mod rules;
mod validator;

pub use log::{ExpectationLogEntry, DEFAULT_MAX_ENTRIES, DEFAULT_WINDOW};
pub use rules::{ExpectedState, OperationKind};
pub use validator::{ConsistencyValidator, DivergenceKind, DivergenceReport};
