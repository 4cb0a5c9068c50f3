//! Routing decisions for worklist mutations.
//!
//! Every submitted operation is either safe to run immediately (Bypass) or
//! must be serialized against all other queue-required work in its view
//! context (Queue). The curated per-context lists are the single source of
//! truth; anything not explicitly listed falls back to Queue.

mod context;
mod table;

pub use context::ViewContext;
pub use table::{ClassificationError, ClassificationTable, Route};
