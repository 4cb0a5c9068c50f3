use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata accompanying one submitted unit of work.
///
/// The work itself (the deferred remote call) travels separately; this is
/// everything the scheduler needs to route and account for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationMeta {
    /// Unique identifier for tracing
    pub id: Uuid,

    /// View context the submitting queue was constructed for
    pub view_context: String,

    /// One of the constants in [`crate::op_types`]
    pub op_type: String,

    /// Caller's explicit bypass request; cannot override a queue-required
    /// classification
    pub bypass_queue: Option<bool>,

    pub created_at: DateTime<Utc>,
}

impl OperationMeta {
    pub fn new(view_context: impl Into<String>, op_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            view_context: view_context.into(),
            op_type: op_type.into(),
            bypass_queue: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_bypass(mut self, bypass: bool) -> Self {
        self.bypass_queue = Some(bypass);
        self
    }
}
