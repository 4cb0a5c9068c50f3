use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use worklist_sync_types::op_types;

use crate::context::ViewContext;

/// Routing decision for one submitted operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Execute immediately; no ordering guarantee against anything in flight
    Bypass,

    /// Serialize FIFO against all other queue-required work in the context
    Queue,
}

/// Validation failure in the curated classification lists
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("operation type '{op_type}' is both bypass-eligible and queue-required in context '{context}'")]
    OverlappingSets {
        context: ViewContext,
        op_type: String,
    },

    #[error("operation type '{op_type}' in context '{context}' is not a known constant")]
    UnknownOperationType {
        context: ViewContext,
        op_type: String,
    },
}

/// The curated lists for one view context
#[derive(Debug, Clone, Default)]
struct ContextRules {
    bypass_eligible: HashSet<String>,
    queue_required: HashSet<String>,
}

fn set_of(constants: &[&str]) -> HashSet<String> {
    constants.iter().map(|s| s.to_string()).collect()
}

/// Per-context mapping of operation types to routing decisions.
///
/// `classify` is pure and infallible; anything the curated lists do not
/// cover defaults to the Queue route. `validate` runs once at coordinator
/// construction and catches list drift before it can misroute anything.
#[derive(Debug, Clone)]
pub struct ClassificationTable {
    rules: HashMap<ViewContext, ContextRules>,
    /// Operation types added through configuration; exempt from the
    /// known-constant check
    declared: HashSet<String>,
}

impl ClassificationTable {
    /// The curated production lists.
    ///
    /// Bypass-eligible entries are annotation-style edits whose effects are
    /// idempotent or commute; everything touching status, counter, or
    /// billing state is queue-required.
    pub fn curated() -> Self {
        let mut rules = HashMap::new();

        rules.insert(
            ViewContext::TaskWorklist,
            ContextRules {
                bypass_eligible: set_of(&[
                    op_types::UPDATE_COMMENT,
                    op_types::SET_LATERALITY,
                    op_types::TOGGLE_LOCK,
                ]),
                queue_required: set_of(&[
                    op_types::START_TASK,
                    op_types::DECREMENT_COUNTER,
                    op_types::MARK_DONE,
                    op_types::UNLOCK_TASK,
                    op_types::CANCEL_TASK,
                ]),
            },
        );

        rules.insert(
            ViewContext::MedicalData,
            ContextRules {
                bypass_eligible: set_of(&[op_types::UPDATE_COMMENT, op_types::SET_LATERALITY]),
                queue_required: set_of(&[
                    op_types::MARK_DONE,
                    op_types::ASSIGN_MODALITY,
                    op_types::RESCHEDULE,
                ]),
            },
        );

        rules.insert(
            ViewContext::Billing,
            ContextRules {
                bypass_eligible: set_of(&[op_types::UPDATE_COMMENT]),
                queue_required: set_of(&[
                    op_types::UPDATE_BILLING_CODE,
                    op_types::CREATE_INVOICE,
                ]),
            },
        );

        // Small default list for contexts nothing curated
        rules.insert(
            ViewContext::Generic,
            ContextRules {
                bypass_eligible: set_of(&[op_types::UPDATE_COMMENT]),
                queue_required: set_of(&[op_types::MARK_DONE, op_types::CANCEL_TASK]),
            },
        );

        Self {
            rules,
            declared: HashSet::new(),
        }
    }

    /// Add configured queue-required operation types for one context.
    pub fn with_extra_queue_required<I, S>(mut self, context: ViewContext, op_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rules = self.rules.entry(context).or_default();
        for op_type in op_types {
            let op_type = op_type.into();
            self.declared.insert(op_type.clone());
            rules.queue_required.insert(op_type);
        }
        self
    }

    /// Add configured bypass-eligible operation types for one context.
    pub fn with_extra_bypass_eligible<I, S>(mut self, context: ViewContext, op_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rules = self.rules.entry(context).or_default();
        for op_type in op_types {
            let op_type = op_type.into();
            self.declared.insert(op_type.clone());
            rules.bypass_eligible.insert(op_type);
        }
        self
    }

    /// Route an operation.
    ///
    /// Resolution order: queue-required wins unconditionally (safety cannot
    /// be overridden), then bypass-eligible, then the caller's explicit
    /// bypass request, then the fail-safe Queue default.
    pub fn classify(
        &self,
        context: ViewContext,
        op_type: &str,
        explicit_bypass: Option<bool>,
    ) -> Route {
        let rules = self
            .rules
            .get(&context)
            .or_else(|| self.rules.get(&ViewContext::Generic));

        if let Some(rules) = rules {
            if rules.queue_required.contains(op_type) {
                return Route::Queue;
            }
            if rules.bypass_eligible.contains(op_type) {
                return Route::Bypass;
            }
        }

        if explicit_bypass == Some(true) {
            return Route::Bypass;
        }

        debug!(
            context = %context,
            op_type,
            "operation type not classified, defaulting to queue"
        );
        Route::Queue
    }

    /// Startup check: per-context sets must be disjoint and must only
    /// reference known operation-type constants (or types declared through
    /// configuration). Everything unlisted is covered by the default-queue
    /// fallback in `classify`.
    pub fn validate(&self) -> Result<(), ClassificationError> {
        let known: HashSet<&str> = op_types::ALL.iter().copied().collect();

        for (&context, rules) in &self.rules {
            for op_type in rules.bypass_eligible.intersection(&rules.queue_required) {
                return Err(ClassificationError::OverlappingSets {
                    context,
                    op_type: op_type.clone(),
                });
            }

            for op_type in rules.bypass_eligible.iter().chain(&rules.queue_required) {
                if !known.contains(op_type.as_str()) && !self.declared.contains(op_type) {
                    return Err(ClassificationError::UnknownOperationType {
                        context,
                        op_type: op_type.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self::curated()
    }
}
