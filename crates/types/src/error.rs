use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection from the remote mutation invoker.
///
/// Always delivered verbatim to the submitter; the scheduling layer never
/// swallows, retries, or reinterprets it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("remote call failed with status {status}: {message}")]
pub struct RemoteError {
    /// HTTP-style status code reported by the invoker
    pub status: u16,
    pub message: String,
}

impl RemoteError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Outcome of one unit of work against the remote store
pub type WorkResult = Result<crate::RefreshSnapshot, RemoteError>;
